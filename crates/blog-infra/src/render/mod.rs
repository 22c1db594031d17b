//! Page renderers.

mod templates;

pub use templates::TemplateRenderer;
