use crate::data::UserRepository;
use crate::domain::user::{LoginUserRequest, RegisterUserRequest, UserResponse};
use crate::domain::{AuthUser, DomainError};
use crate::infrastructure::jwt::JwtService;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::Arc;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            user_repo,
            jwt_service,
        }
    }

    pub async fn register(
        &self,
        req: RegisterUserRequest,
    ) -> Result<(String, UserResponse), DomainError> {
        tracing::debug!("Registration attempt: username={}", req.username);

        let new_user = req.into_new_user()?;

        if self
            .user_repo
            .find_by_username(&new_user.username)
            .await
            .is_ok()
        {
            tracing::warn!("Registration failed: username already exists");
            return Err(DomainError::UserAlreadyExists);
        }

        if self.user_repo.find_by_email(&new_user.email).await.is_ok() {
            tracing::warn!("Registration failed: email already exists");
            return Err(DomainError::UserAlreadyExists);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Password hashing failed: {}", e);
                DomainError::InternalError(format!("Password hashing failed: {}", e))
            })?
            .to_string();

        let user = self.user_repo.create(new_user, password_hash).await?;
        let token = self.jwt_service.generate_token(&user)?;

        tracing::info!(
            "User registered successfully: id={}, username={}",
            user.id,
            user.username
        );

        Ok((token, UserResponse::from(user)))
    }

    pub async fn login(
        &self,
        req: LoginUserRequest,
    ) -> Result<(String, UserResponse), DomainError> {
        tracing::debug!("Login attempt: username={}", req.username);

        // unknown user and wrong password look the same to the caller
        let user = match self.user_repo.find_by_username(req.username.trim()).await {
            Ok(u) => u,
            Err(DomainError::UserNotFound) => {
                tracing::warn!("Login for unknown user: {}", req.username);
                return Err(DomainError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            tracing::error!("Invalid password hash format: {}", e);
            DomainError::InternalError(format!("Invalid password hash: {}", e))
        })?;

        if Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::warn!("Invalid password for user {}", user.username);
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.jwt_service.generate_token(&user)?;

        tracing::info!(
            "User logged in successfully: id={}, username={}",
            user.id,
            user.username
        );

        Ok((token, UserResponse::from(user)))
    }

    /// Profile of the caller; a token for a user that no longer exists is rejected.
    pub async fn me(&self, identity: &AuthUser) -> Result<UserResponse, DomainError> {
        match self.user_repo.find_by_id(identity.id).await {
            Ok(user) => Ok(UserResponse::from(user)),
            Err(DomainError::UserNotFound) => Err(DomainError::Unauthorized(
                "User no longer exists".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub fn authenticate(&self, token: &str) -> Result<AuthUser, DomainError> {
        self.jwt_service.verify_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryUserRepository;

    fn service() -> AuthService {
        let jwt = Arc::new(JwtService::new("unit-test-secret-unit-test-secret!!").unwrap());
        AuthService::new(Arc::new(InMemoryUserRepository::new()), jwt)
    }

    fn register_req(username: &str, email: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.into(),
            email: email.into(),
            password: "password123".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login_issues_verifiable_tokens() {
        let svc = service();
        let (token, user) = svc
            .register(register_req("jane_smith", "jane@example.com"))
            .await
            .unwrap();
        assert_eq!(svc.authenticate(&token).unwrap().id, user.id);

        let (login_token, login_user) = svc
            .login(LoginUserRequest {
                username: "jane_smith".into(),
                password: "password123".into(),
            })
            .await
            .unwrap();
        assert_eq!(login_user.id, user.id);

        let identity = svc.authenticate(&login_token).unwrap();
        assert_eq!(svc.me(&identity).await.unwrap().email, "jane@example.com");
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let svc = service();
        svc.register(register_req("jane_smith", "jane@example.com"))
            .await
            .unwrap();

        assert!(matches!(
            svc.register(register_req("jane_smith", "other@example.com"))
                .await,
            Err(DomainError::UserAlreadyExists)
        ));
        assert!(matches!(
            svc.register(register_req("someone_else", "JANE@example.com"))
                .await,
            Err(DomainError::UserAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let svc = service();
        svc.register(register_req("jane_smith", "jane@example.com"))
            .await
            .unwrap();

        let wrong_password = svc
            .login(LoginUserRequest {
                username: "jane_smith".into(),
                password: "nope-nope".into(),
            })
            .await;
        let unknown_user = svc
            .login(LoginUserRequest {
                username: "ghost".into(),
                password: "password123".into(),
            })
            .await;

        assert!(matches!(wrong_password, Err(DomainError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(DomainError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn invalid_registration_is_a_validation_error() {
        let svc = service();
        let err = svc
            .register(RegisterUserRequest {
                username: "x".into(),
                email: "bad".into(),
                password: "1".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["username", "email", "password"]);
    }
}
