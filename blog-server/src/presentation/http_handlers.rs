use crate::application::{AuthService, BlogService};
use crate::domain::pagination::ListPostsQuery;
use crate::domain::post::{CreatePostRequest, UpdatePostRequest};
use crate::domain::user::{LoginUserRequest, RegisterUserRequest, UserResponse};
use crate::domain::{AuthUser, DomainError};
use actix_web::{web, HttpResponse};
use std::sync::Arc;

type HandlerResult = Result<HttpResponse, DomainError>;

#[derive(serde::Serialize)]
struct AuthResponse {
    token: String,
    user: UserResponse,
}

#[derive(serde::Serialize)]
struct MessageResponse {
    message: &'static str,
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// ============== Auth Handlers ==============

pub async fn register(
    auth_service: web::Data<Arc<AuthService>>,
    req: web::Json<RegisterUserRequest>,
) -> HandlerResult {
    let (token, user) = auth_service.register(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(AuthResponse { token, user }))
}

pub async fn login(
    auth_service: web::Data<Arc<AuthService>>,
    req: web::Json<LoginUserRequest>,
) -> HandlerResult {
    let (token, user) = auth_service.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

pub async fn me(auth_service: web::Data<Arc<AuthService>>, user: AuthUser) -> HandlerResult {
    let profile = auth_service.me(&user).await?;
    Ok(HttpResponse::Ok().json(profile))
}

// ============== Post Handlers ==============

pub async fn list_posts(
    blog_service: web::Data<Arc<BlogService>>,
    query: web::Query<Vec<(String, String)>>,
) -> HandlerResult {
    let query = ListPostsQuery::from_pairs(query.into_inner());

    tracing::info!(
        "Listing posts with page={:?}, limit={:?}, search={:?}, author={:?}",
        query.page,
        query.limit,
        query.search,
        query.author
    );

    let page = blog_service.list_posts(query).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_post(
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<String>,
) -> HandlerResult {
    let post_id = path.into_inner();

    tracing::info!("Getting post with id={}", post_id);

    let post = blog_service.get_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn create_post(
    user: AuthUser,
    blog_service: web::Data<Arc<BlogService>>,
    post_data: web::Json<CreatePostRequest>,
) -> HandlerResult {
    tracing::info!("Creating post for user_id={}", user.id);

    let post = blog_service
        .create_post(&user, post_data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(post))
}

pub async fn update_post(
    user: AuthUser,
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<String>,
    post_data: web::Json<UpdatePostRequest>,
) -> HandlerResult {
    let post_id = path.into_inner();

    tracing::info!("Updating post id={} for user_id={}", post_id, user.id);

    let post = blog_service
        .update_post(&user, &post_id, post_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn delete_post(
    user: AuthUser,
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<String>,
) -> HandlerResult {
    let post_id = path.into_inner();

    tracing::info!("Deleting post id={} for user_id={}", post_id, user.id);

    blog_service.delete_post(&user, &post_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Post deleted successfully",
    }))
}
