//! Render targets for the blog view.

use minijinja::Environment;
use serde::Serialize;

use super::pipeline::View;
use super::store::LoadError;

/// Message shown when a filter or search matches nothing.
pub const EMPTY_MESSAGE: &str = "No posts found matching your criteria.";

/// Message shown when the post index could not be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Unable to load blog posts at this time.";

const GRID_TEMPLATE_NAME: &str = "blog_grid.html";

/// Card grid template (`MiniJinja`, HTML-escaped).
pub const GRID_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/blog_grid.html"
));

/// Receives the pipeline's view whenever it changes.
pub trait RenderTarget {
    fn render(&mut self, view: &View<'_>);

    /// Shows a load failure. The message text is up to the target.
    fn render_error(&mut self, error: &LoadError);
}

#[derive(Serialize)]
struct CardContext<'a> {
    id: &'a str,
    title: &'a str,
    category: &'a str,
    tags: &'a [String],
    date: &'a str,
    display_date: String,
    excerpt: &'a str,
    read_time: &'a str,
}

#[derive(Serialize)]
struct GridContext<'a> {
    posts: Vec<CardContext<'a>>,
    posts_base: &'a str,
    empty_message: &'static str,
}

/// Renders the view as a grid of HTML post cards.
///
/// As a [`RenderTarget`] it keeps the latest markup in [`HtmlRenderer::html`],
/// like a container element that gets repainted.
pub struct HtmlRenderer {
    env: Environment<'static>,
    posts_base: String,
    html: String,
}

impl std::fmt::Debug for HtmlRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlRenderer")
            .field("posts_base", &self.posts_base)
            .field("html_len", &self.html.len())
            .finish_non_exhaustive()
    }
}

impl HtmlRenderer {
    /// Creates a renderer linking cards to `{posts_base}/{id}.html`.
    ///
    /// # Errors
    /// Returns an error if the built-in template fails to compile.
    pub fn new(posts_base: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(GRID_TEMPLATE_NAME, GRID_TEMPLATE)?;
        Ok(Self {
            env,
            posts_base: posts_base.into().trim_end_matches('/').to_string(),
            html: String::new(),
        })
    }

    /// Markup from the most recent repaint.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Renders a view to markup. A not-yet-loaded view renders nothing.
    ///
    /// # Errors
    /// Returns an error if template rendering fails.
    pub fn render_to_string(&self, view: &View<'_>) -> Result<String, minijinja::Error> {
        let View::Posts(posts) = view else {
            return Ok(String::new());
        };

        let context = GridContext {
            posts: posts
                .iter()
                .map(|post| CardContext {
                    id: &post.id,
                    title: &post.title,
                    category: &post.category,
                    tags: &post.tags,
                    date: &post.date,
                    display_date: post.display_date(),
                    excerpt: &post.excerpt,
                    read_time: &post.read_time,
                })
                .collect(),
            posts_base: &self.posts_base,
            empty_message: EMPTY_MESSAGE,
        };

        let output = self
            .env
            .get_template(GRID_TEMPLATE_NAME)?
            .render(&context)?;
        Ok(output.trim().to_string())
    }

    /// Markup for a failed load.
    pub fn error_html() -> String {
        format!(r#"<p class="blog-error">{LOAD_ERROR_MESSAGE}</p>"#)
    }
}

impl RenderTarget for HtmlRenderer {
    fn render(&mut self, view: &View<'_>) {
        match self.render_to_string(view) {
            Ok(html) => self.html = html,
            Err(error) => {
                tracing::warn!("failed to render blog grid: {error}");
                self.html = Self::error_html();
            }
        }
    }

    fn render_error(&mut self, _error: &LoadError) {
        self.html = Self::error_html();
    }
}
