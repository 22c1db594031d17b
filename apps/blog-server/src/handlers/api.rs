//! JSON page endpoints - the same records the HTML pages render.

use actix_web::{HttpResponse, web};
use blog_core::Page;
use blog_shared::ApiResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/pages/index
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let page = state.pages.index().await?;
    Ok(json(Page::Index(page)))
}

/// GET /api/pages/post/{slug}
pub async fn post_detail(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let page = state.pages.post_detail(&slug).await?;
    Ok(json(Page::PostDetails(page)))
}

/// GET /api/pages/tag/{title}
pub async fn tag_filter(
    state: web::Data<AppState>,
    title: web::Path<String>,
) -> AppResult<HttpResponse> {
    let page = state.pages.tag_filter(&title).await?;
    Ok(json(Page::PostsList(page)))
}

fn json(page: Page) -> HttpResponse {
    let template = page.template_name();
    HttpResponse::Ok().json(ApiResponse::ok(page).with_template(template))
}
