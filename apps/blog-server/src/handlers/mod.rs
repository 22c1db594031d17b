//! HTTP handlers and route configuration.

mod api;
mod health;
mod pages;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/pages")
                    .route("/index", web::get().to(api::index))
                    .route("/post/{slug}", web::get().to(api::post_detail))
                    .route("/tag/{title}", web::get().to(api::tag_filter)),
            ),
    )
    .route("/", web::get().to(pages::index))
    .route("/post/{slug}", web::get().to(pages::post_detail))
    .route("/tag/{title}", web::get().to(pages::tag_filter))
    .route("/contacts", web::get().to(pages::contacts));
}
