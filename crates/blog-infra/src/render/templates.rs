//! Mustache template renderer backed by ramhorns.

use std::collections::HashMap;
use std::path::Path;

use ramhorns::Template;

use blog_core::pages::Page;
use blog_core::ports::{PageRenderer, RenderError};

/// Holds one parsed template per page kind.
pub struct TemplateRenderer {
    templates: HashMap<&'static str, Template<'static>>,
}

impl TemplateRenderer {
    /// Load `<name>.html` from `dir` for every page template name.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let dir = dir.as_ref();
        let mut sources = Vec::with_capacity(Page::TEMPLATES.len());
        for name in Page::TEMPLATES {
            let path = dir.join(format!("{name}.html"));
            let source = std::fs::read_to_string(&path)?;
            tracing::debug!(template = name, path = %path.display(), "Loaded template");
            sources.push((name, source));
        }
        Self::from_sources(sources)
    }

    /// Parse templates from in-memory sources keyed by template name.
    pub fn from_sources(
        sources: impl IntoIterator<Item = (&'static str, String)>,
    ) -> Result<Self, RenderError> {
        let mut templates = HashMap::new();
        for (name, source) in sources {
            let template = Template::new(source)
                .map_err(|e| RenderError::Template(format!("{name}: {e}")))?;
            templates.insert(name, template);
        }
        Ok(Self { templates })
    }
}

impl PageRenderer for TemplateRenderer {
    fn render(&self, page: &Page) -> Result<String, RenderError> {
        let name = page.template_name();
        let template = self
            .templates
            .get(name)
            .ok_or(RenderError::TemplateMissing(name))?;

        Ok(match page {
            Page::Index(context) => template.render(context),
            Page::PostDetails(context) => template.render(context),
            Page::PostsList(context) => template.render(context),
            Page::Contacts(context) => template.render(context),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use blog_core::pages::{ContactsPage, PostsListPage};
    use blog_core::view::{PostSummary, TagSummary};

    use super::*;

    fn summary() -> PostSummary {
        PostSummary {
            title: "<Hello>".to_string(),
            teaser_text: "Body".to_string(),
            author: "alice".to_string(),
            comments_amount: 2,
            image_url: None,
            published_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap().into(),
            slug: "hello".to_string(),
            tags: vec![TagSummary {
                title: "rust".to_string(),
                posts_with_tag: 4,
                url: "/tag/rust".to_string(),
            }],
            first_tag_title: Some("rust".to_string()),
            first_tag_url: Some("/tag/rust".to_string()),
        }
    }

    #[test]
    fn test_render_posts_list() {
        let renderer = TemplateRenderer::from_sources([(
            "posts-list",
            "TAG=[{{tag}}]{{#posts}}POST=[{{title}}|{{slug}}|{{published_at}}|{{comments_amount}}]\
             {{#tags}}({{title}}:{{posts_with_tag}}){{/tags}}{{^image_url}}NOIMG{{/image_url}}{{/posts}}"
                .to_string(),
        )])
        .unwrap();

        let page = Page::PostsList(PostsListPage {
            tag: "rust".to_string(),
            posts: vec![summary()],
            popular_tags: vec![],
            most_popular_posts: vec![],
        });
        let html = renderer.render(&page).unwrap();

        assert_eq!(
            html,
            "TAG=[rust]POST=[&lt;Hello&gt;|hello|02 January 2024 03:04|2](rust:4)NOIMG"
        );
    }

    #[test]
    fn test_missing_template() {
        let renderer = TemplateRenderer::from_sources(Vec::new()).unwrap();
        let err = renderer
            .render(&Page::Contacts(ContactsPage::default()))
            .unwrap_err();
        assert!(matches!(err, RenderError::TemplateMissing("contacts")));
    }

    #[test]
    fn test_shipped_templates_render() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");
        let renderer = TemplateRenderer::from_dir(dir).unwrap();

        let html = renderer
            .render(&Page::PostsList(PostsListPage {
                tag: "rust".to_string(),
                posts: vec![summary()],
                popular_tags: vec![],
                most_popular_posts: vec![summary()],
            }))
            .unwrap();
        assert!(html.contains("Posts tagged rust"));
        assert!(html.contains(r#"<a href="/post/hello">&lt;Hello&gt;</a>"#));

        let html = renderer
            .render(&Page::Contacts(ContactsPage::default()))
            .unwrap();
        assert!(html.contains("<h1>Contacts</h1>"));
    }

    #[test]
    fn test_from_dir_missing_file() {
        let err = TemplateRenderer::from_dir("/nonexistent/templates").err().unwrap();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
