use crate::pages::Page;

/// Renders an assembled page into a document, keyed by the page's template name.
pub trait PageRenderer: Send + Sync {
    fn render(&self, page: &Page) -> Result<String, RenderError>;
}

/// Rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template not registered: {0}")]
    TemplateMissing(&'static str),

    #[error("Template parsing failed: {0}")]
    Template(String),

    #[error("Template loading failed: {0}")]
    Io(#[from] std::io::Error),
}
