use super::error::{json_error_handler, query_error_handler};
use super::http_handlers;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/health", web::get().to(http_handlers::health))
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(http_handlers::register))
                .route("/login", web::post().to(http_handlers::login))
                .route("/me", web::get().to(http_handlers::me)),
        )
        // write routes authenticate through the AuthUser extractor
        .service(
            web::scope("/api/posts")
                .route("", web::get().to(http_handlers::list_posts))
                .route("", web::post().to(http_handlers::create_post))
                .route("/{id}", web::get().to(http_handlers::get_post))
                .route("/{id}", web::put().to(http_handlers::update_post))
                .route("/{id}", web::delete().to(http_handlers::delete_post)),
        );
}
