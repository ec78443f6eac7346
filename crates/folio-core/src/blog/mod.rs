//! Blog post index: loading, view pipeline, rendering.

pub mod pipeline;
pub mod post;
pub mod render;
pub mod store;

pub use pipeline::{
    ALL_CATEGORIES, BlogPipeline, CategoryFilter, PipelineOptions, SortMode, View, ViewState,
};
pub use post::{Post, parse_post_date};
pub use render::{HtmlRenderer, RenderTarget};
pub use store::{LoadError, LoadErrorKind, LoadOptions, LoadResult, PostSource, load, load_with};
