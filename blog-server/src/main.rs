use dotenvy::dotenv;
use std::sync::Arc;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use application::{AuthService, BlogService};
use data::{
    InMemoryPostRepository, InMemoryUserRepository, PostRepository, PostgresPostRepository,
    PostgresUserRepository, UserRepository,
};
use infrastructure::{
    config::Config,
    database::{create_pool, run_migrations},
    jwt::JwtService,
    logging::init_logging,
};

type Repositories = (
    Arc<dyn UserRepository + Send + Sync>,
    Arc<dyn PostRepository + Send + Sync>,
);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    init_logging()?;

    let config = Config::from_env()?;

    tracing::info!("Starting blog server...");
    tracing::info!("HTTP server will listen on {}", config.http_addr());
    tracing::info!("CORS allowed origins: {:?}", config.cors_allowed_origins);

    let (user_repo, post_repo) = build_repositories(&config).await?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret)?);
    let auth_service = Arc::new(AuthService::new(user_repo, jwt_service));
    let blog_service = Arc::new(BlogService::new(post_repo));

    tracing::info!("Services initialized successfully");

    run_http_server(config, auth_service, blog_service).await?;

    tracing::info!("Shutting down...");
    Ok(())
}

async fn build_repositories(config: &Config) -> anyhow::Result<Repositories> {
    match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = create_pool(database_url, config.database_max_connections).await?;

            tracing::info!("Running database migrations...");
            run_migrations(&pool).await?;

            Ok((
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresPostRepository::new(pool)),
            ))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, data will live in memory only");
            Ok((
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryPostRepository::new()),
            ))
        }
    }
}

/// Configure CORS for the HTTP server with allowed origins from .env
fn configure_cors(allowed_origins: &[String]) -> actix_cors::Cors {
    use actix_cors::Cors;
    use actix_web::http::header;

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(3600);

    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
        tracing::debug!("Added allowed CORS origin: {}", origin);
    }

    cors
}

async fn run_http_server(
    config: Config,
    auth_service: Arc<AuthService>,
    blog_service: Arc<BlogService>,
) -> anyhow::Result<()> {
    use actix_web::{middleware::Logger, web, App, HttpServer};

    let addr = config.http_addr();
    let origins = config.cors_allowed_origins;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(configure_cors(&origins))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(blog_service.clone()))
            .configure(presentation::routes::configure)
    })
    .bind(&addr)?
    .run();

    tracing::info!("HTTP server running on {}", addr);

    server.await?;

    Ok(())
}
