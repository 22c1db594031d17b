//! HTML page handlers.

use actix_web::{HttpResponse, http::header::ContentType, web};
use blog_core::Page;

use crate::middleware::error::AppResult;
use crate::observability::RequestId;
use crate::state::AppState;

/// GET /
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let page = state.pages.index().await?;
    render(&state, Page::Index(page))
}

/// GET /post/{slug}
pub async fn post_detail(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    request_id: RequestId,
) -> AppResult<HttpResponse> {
    tracing::debug!(request_id = request_id.as_str(), slug = %slug, "Post detail requested");
    let page = state.pages.post_detail(&slug).await?;
    render(&state, Page::PostDetails(page))
}

/// GET /tag/{title}
pub async fn tag_filter(
    state: web::Data<AppState>,
    title: web::Path<String>,
    request_id: RequestId,
) -> AppResult<HttpResponse> {
    tracing::debug!(request_id = request_id.as_str(), tag = %title, "Tag listing requested");
    let page = state.pages.tag_filter(&title).await?;
    render(&state, Page::PostsList(page))
}

/// GET /contacts
pub async fn contacts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    render(&state, Page::Contacts(state.pages.contacts()))
}

fn render(state: &AppState, page: Page) -> AppResult<HttpResponse> {
    let body = state.renderer.render(&page)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
