//! Post command handlers.

use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table};
use folio_core::blog::render::{EMPTY_MESSAGE, LOAD_ERROR_MESSAGE};
use folio_core::blog::{
    BlogPipeline, HtmlRenderer, LoadError, PostSource, RenderTarget, SortMode, View,
};
use folio_core::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Post cards as HTML
    Html,
    /// Posts as a JSON array
    Json,
}

#[derive(Debug, Clone)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<SortMode>,
    pub format: OutputFormat,
}

/// Prints each repaint of the view to stdout.
struct StdoutTarget {
    format: OutputFormat,
    html: HtmlRenderer,
}

impl StdoutTarget {
    fn new(format: OutputFormat, posts_base: &str) -> Result<Self> {
        let html = HtmlRenderer::new(posts_base).context("compile post card template")?;
        Ok(Self { format, html })
    }
}

impl RenderTarget for StdoutTarget {
    fn render(&mut self, view: &View<'_>) {
        if !view.is_loaded() {
            return;
        }
        match self.format {
            OutputFormat::Table => print_table(view),
            OutputFormat::Html => match self.html.render_to_string(view) {
                Ok(html) => println!("{html}"),
                Err(error) => tracing::error!("failed to render posts as HTML: {error}"),
            },
            OutputFormat::Json => match serde_json::to_string_pretty(view.posts()) {
                Ok(json) => println!("{json}"),
                Err(error) => tracing::error!("failed to serialize posts: {error}"),
            },
        }
    }

    fn render_error(&mut self, _error: &LoadError) {
        match self.format {
            OutputFormat::Html => println!("{}", HtmlRenderer::error_html()),
            OutputFormat::Table => println!("{LOAD_ERROR_MESSAGE}"),
            OutputFormat::Json => {}
        }
    }
}

fn print_table(view: &View<'_>) {
    if view.is_empty() {
        println!("{EMPTY_MESSAGE}");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Date", "Title", "Category", "Tags", "Read time", "Id"]);
    for post in view.posts() {
        table.add_row(vec![
            post.display_date(),
            post.title.clone(),
            post.category.clone(),
            post.tags.join(", "),
            post.read_time.clone(),
            post.id.clone(),
        ]);
    }
    println!("{table}");
}

fn require_source(config: &Config, source: Option<&str>) -> Result<PostSource> {
    config
        .resolve_source(source)
        .context("No post index source: pass --source or set posts_source in config")
}

pub async fn list(config: &Config, source: Option<&str>, query: &ListQuery) -> Result<()> {
    let source = require_source(config, source)?;

    let mut pipeline = BlogPipeline::with_options(config.pipeline_options());
    // Selections made before load are applied once the posts arrive.
    if let Some(category) = query.category.as_deref() {
        pipeline.set_filter(category);
    }
    if let Some(term) = query.search.as_deref() {
        pipeline.set_search(term);
    }
    if let Some(sort) = query.sort {
        pipeline.set_sort(sort);
    }
    pipeline.subscribe(Box::new(StdoutTarget::new(query.format, &config.posts_base)?));

    pipeline
        .load(&source, &config.load_options())
        .await
        .with_context(|| format!("load post index from {source}"))?;
    Ok(())
}

pub async fn categories(config: &Config, source: Option<&str>, with_tags: bool) -> Result<()> {
    let source = require_source(config, source)?;

    let mut pipeline = BlogPipeline::with_options(config.pipeline_options());
    pipeline
        .load(&source, &config.load_options())
        .await
        .with_context(|| format!("load post index from {source}"))?;

    let names = if with_tags {
        pipeline.topics()
    } else {
        pipeline.categories()
    };
    if names.is_empty() {
        println!("No categories found.");
    } else {
        for name in names {
            let count = pipeline.posts_by_category(&name).len();
            println!("{name}  ({count})");
        }
    }
    Ok(())
}
