//! Blog view pipeline.
//!
//! Holds the loaded post collection plus the filter/search/sort selections
//! and derives the visible sequence from them. The visible sequence is
//! recomputed from scratch on every change: category filter, then search,
//! then a stable sort by calendar date.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::post::Post;
use super::render::RenderTarget;
use super::store::{self, LoadError, LoadOptions, LoadResult, PostSource};

/// Filter value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Date ordering of the visible posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortMode {
    /// Newest first (default)
    #[default]
    #[serde(rename = "date-desc")]
    DateDesc,
    /// Oldest first
    #[serde(rename = "date-asc")]
    DateAsc,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::DateDesc => "date-desc",
            SortMode::DateAsc => "date-asc",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date-desc" | "desc" | "newest" => Ok(SortMode::DateDesc),
            "date-asc" | "asc" | "oldest" => Ok(SortMode::DateAsc),
            other => Err(format!(
                "unknown sort mode '{other}' (expected date-desc or date-asc)"
            )),
        }
    }
}

/// Category filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Lowercased category (or tag) name.
    Named(String),
}

impl CategoryFilter {
    /// Normalizes a raw selection; `all` (any case) and blank clear the filter.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(trimmed.to_lowercase())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }
}

/// The filter/search/sort selections that determine the visible posts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub filter: CategoryFilter,
    /// Lowercased, trimmed search term; empty means no search.
    pub search: String,
    pub sort: SortMode,
}

/// The currently visible posts.
///
/// `NotLoaded` and an empty `Posts` are distinct: the latter is a valid
/// result of a filter or search that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    NotLoaded,
    Posts(Vec<&'a Post>),
}

impl<'a> View<'a> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, View::Posts(_))
    }

    pub fn posts(&self) -> &[&'a Post] {
        match self {
            View::NotLoaded => &[],
            View::Posts(posts) => posts,
        }
    }

    pub fn len(&self) -> usize {
        self.posts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts().is_empty()
    }

    /// Post ids in view order.
    pub fn ids(&self) -> Vec<&'a str> {
        self.posts().iter().map(|&post| post.id.as_str()).collect()
    }
}

/// Matching and ordering policy for a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Category filter also matches tags.
    pub match_tags: bool,
    pub default_sort: SortMode,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            match_tags: true,
            default_sort: SortMode::DateDesc,
        }
    }
}

struct LoadedPosts {
    posts: Vec<Post>,
    /// Parsed `date` of each post, by index.
    dates: Vec<Option<NaiveDate>>,
}

/// Owns the post collection and derives the visible view from it.
///
/// Selections made before posts are installed are kept and applied once
/// they arrive; until then [`BlogPipeline::current_view`] is
/// [`View::NotLoaded`].
pub struct BlogPipeline {
    loaded: Option<LoadedPosts>,
    state: ViewState,
    match_tags: bool,
    /// Indices into `loaded.posts`, in view order.
    visible: Vec<usize>,
    observers: Vec<Box<dyn RenderTarget>>,
}

impl Default for BlogPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BlogPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlogPipeline")
            .field("loaded", &self.loaded.as_ref().map(|l| l.posts.len()))
            .field("state", &self.state)
            .field("match_tags", &self.match_tags)
            .field("visible", &self.visible)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl BlogPipeline {
    pub fn new() -> Self {
        Self::with_options(PipelineOptions::default())
    }

    pub fn with_options(options: PipelineOptions) -> Self {
        Self {
            loaded: None,
            state: ViewState {
                sort: options.default_sort,
                ..ViewState::default()
            },
            match_tags: options.match_tags,
            visible: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Registers a render target that is repainted on every view change.
    pub fn subscribe(&mut self, target: Box<dyn RenderTarget>) {
        self.observers.push(target);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The full post collection in source order (empty before load).
    pub fn posts(&self) -> &[Post] {
        match &self.loaded {
            Some(loaded) => &loaded.posts,
            None => &[],
        }
    }

    /// Loads the index from `source` and installs it.
    ///
    /// On failure the pipeline keeps its previous posts (none, if it was not
    /// loaded), observers are shown the error, and the error is returned.
    /// There is no retry.
    ///
    /// # Errors
    /// Returns the [`LoadError`] from [`store::load_with`].
    pub async fn load(&mut self, source: &PostSource, options: &LoadOptions) -> LoadResult<usize> {
        match store::load_with(source, options).await {
            Ok(posts) => {
                let count = posts.len();
                self.install(posts);
                Ok(count)
            }
            Err(error) => {
                tracing::warn!(%source, kind = %error.kind, "failed to load post index: {error}");
                self.report_error(&error);
                Err(error)
            }
        }
    }

    /// Replaces the post collection and repaints.
    pub fn install(&mut self, posts: Vec<Post>) {
        let dates = posts.iter().map(Post::parsed_date).collect();
        self.loaded = Some(LoadedPosts { posts, dates });
        self.refresh();
    }

    /// Shows a load failure on every observer.
    pub fn report_error(&mut self, error: &LoadError) {
        for observer in &mut self.observers {
            observer.render_error(error);
        }
    }

    /// Sets the category filter; `all` clears it.
    pub fn set_filter(&mut self, category: &str) {
        self.state.filter = CategoryFilter::parse(category);
        self.refresh();
    }

    /// Sets the search term; a blank term clears it.
    pub fn set_search(&mut self, term: &str) {
        self.state.search = term.trim().to_lowercase();
        self.refresh();
    }

    pub fn set_sort(&mut self, mode: SortMode) {
        self.state.sort = mode;
        self.refresh();
    }

    /// Returns the visible posts in final order.
    pub fn current_view(&self) -> View<'_> {
        view_of(self.loaded.as_ref(), &self.visible)
    }

    /// Unique post categories, compared and sorted case-insensitively.
    pub fn categories(&self) -> Vec<String> {
        sorted_unique(self.posts().iter().map(|post| post.category.as_str()))
    }

    /// Unique categories and tags, compared and sorted case-insensitively.
    pub fn topics(&self) -> Vec<String> {
        sorted_unique(self.posts().iter().flat_map(|post| {
            std::iter::once(post.category.as_str()).chain(post.tags.iter().map(String::as_str))
        }))
    }

    /// Posts whose category or any tag equals `name` (case-insensitive), in
    /// source order. Independent of the current view state.
    pub fn posts_by_category(&self, name: &str) -> Vec<&Post> {
        self.posts()
            .iter()
            .filter(|post| post.matches_topic(name, true))
            .collect()
    }

    fn refresh(&mut self) {
        self.visible = match &self.loaded {
            Some(loaded) => compute_visible(loaded, &self.state, self.match_tags),
            None => Vec::new(),
        };
        tracing::trace!(
            filter = ?self.state.filter,
            search = %self.state.search,
            sort = %self.state.sort,
            visible = self.visible.len(),
            "recomputed blog view"
        );

        if self.observers.is_empty() {
            return;
        }
        let view = view_of(self.loaded.as_ref(), &self.visible);
        for observer in &mut self.observers {
            observer.render(&view);
        }
    }
}

fn view_of<'a>(loaded: Option<&'a LoadedPosts>, visible: &[usize]) -> View<'a> {
    match loaded {
        Some(loaded) => View::Posts(visible.iter().map(|&i| &loaded.posts[i]).collect()),
        None => View::NotLoaded,
    }
}

fn compute_visible(loaded: &LoadedPosts, state: &ViewState, match_tags: bool) -> Vec<usize> {
    let mut visible: Vec<usize> = loaded
        .posts
        .iter()
        .enumerate()
        .filter(|(_, post)| match &state.filter {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => post.matches_topic(name, match_tags),
        })
        .filter(|(_, post)| state.search.is_empty() || post.matches_search(&state.search))
        .map(|(i, _)| i)
        .collect();

    // `sort_by` is stable, so equal dates keep source order.
    visible.sort_by(|&a, &b| compare_dates(loaded.dates[a], loaded.dates[b], state.sort));
    visible
}

/// Orders two parsed dates; unparseable dates go last in either direction.
fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>, sort: SortMode) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match sort {
            SortMode::DateDesc => b.cmp(&a),
            SortMode::DateAsc => a.cmp(&b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Dedups names case-insensitively, keeping the first spelling seen.
fn sorted_unique<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut unique: BTreeMap<String, &str> = BTreeMap::new();
    for name in names {
        unique.entry(name.to_lowercase()).or_insert(name);
    }
    unique.into_values().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    use tempfile::tempdir;

    use super::*;
    use crate::blog::post::sample;
    use crate::blog::store::LoadErrorKind;

    fn scenario_posts() -> Vec<Post> {
        vec![
            sample("a", "Tech", &["ai"], "2024-01-01"),
            sample("b", "Life", &[], "2024-06-01"),
        ]
    }

    fn loaded(posts: Vec<Post>) -> BlogPipeline {
        let mut pipeline = BlogPipeline::new();
        pipeline.install(posts);
        pipeline
    }

    #[derive(Default)]
    struct Recorded {
        views: Vec<Option<Vec<String>>>,
        errors: Vec<LoadErrorKind>,
    }

    struct Recorder(Rc<RefCell<Recorded>>);

    impl RenderTarget for Recorder {
        fn render(&mut self, view: &View<'_>) {
            let ids = view
                .is_loaded()
                .then(|| view.ids().into_iter().map(str::to_string).collect());
            self.0.borrow_mut().views.push(ids);
        }

        fn render_error(&mut self, error: &LoadError) {
            self.0.borrow_mut().errors.push(error.kind);
        }
    }

    #[test]
    fn test_defaults_before_load() {
        let pipeline = BlogPipeline::new();
        assert!(!pipeline.is_loaded());
        assert_eq!(pipeline.current_view(), View::NotLoaded);
        assert_eq!(pipeline.state(), &ViewState::default());
        assert_eq!(pipeline.state().sort, SortMode::DateDesc);
        assert!(pipeline.categories().is_empty());
    }

    #[test]
    fn test_scenario_filter_then_search() {
        let mut pipeline = loaded(scenario_posts());

        pipeline.set_filter("Tech");
        assert_eq!(pipeline.current_view().ids(), vec!["a"]);

        pipeline.set_filter("all");
        pipeline.set_search("ai");
        assert_eq!(pipeline.current_view().ids(), vec!["a"]);

        pipeline.set_search("nomatch");
        let view = pipeline.current_view();
        assert!(view.is_loaded());
        assert!(view.is_empty());
    }

    #[test]
    fn test_filter_is_case_insensitive_subset_in_sorted_order() {
        let mut pipeline = loaded(vec![
            sample("t1", "Tech", &[], "2024-03-01"),
            sample("l1", "Life", &[], "2024-04-01"),
            sample("t2", "tech", &[], "2024-05-01"),
            sample("t3", "TECH", &[], "2024-01-01"),
        ]);

        pipeline.set_filter("tEcH");
        assert_eq!(pipeline.current_view().ids(), vec!["t2", "t1", "t3"]);
    }

    #[test]
    fn test_filter_matches_tags_by_default() {
        let mut pipeline = loaded(vec![
            sample("a", "Tech", &["Rust"], "2024-01-01"),
            sample("b", "Life", &["rust"], "2024-02-01"),
            sample("c", "Life", &[], "2024-03-01"),
        ]);

        pipeline.set_filter("rust");
        assert_eq!(pipeline.current_view().ids(), vec!["b", "a"]);
    }

    #[test]
    fn test_filter_category_only_policy() {
        let mut pipeline = BlogPipeline::with_options(PipelineOptions {
            match_tags: false,
            ..PipelineOptions::default()
        });
        pipeline.install(vec![
            sample("a", "Tech", &["Rust"], "2024-01-01"),
            sample("b", "Rust", &[], "2024-02-01"),
        ]);

        pipeline.set_filter("rust");
        assert_eq!(pipeline.current_view().ids(), vec!["b"]);
    }

    #[test]
    fn test_all_is_identity_filter() {
        let posts = vec![
            sample("a", "Tech", &[], "2024-01-01"),
            sample("b", "Life", &[], "2024-02-01"),
            sample("c", "Art", &[], "2024-03-01"),
        ];
        let mut pipeline = loaded(posts);
        let unfiltered = pipeline.current_view().ids().join(",");

        pipeline.set_filter("Life");
        pipeline.set_filter("ALL");
        assert!(pipeline.state().filter.is_all());
        assert_eq!(pipeline.current_view().ids().join(","), unfiltered);
        assert_eq!(pipeline.current_view().len(), 3);
    }

    #[test]
    fn test_unknown_category_yields_empty_view() {
        let mut pipeline = loaded(scenario_posts());
        pipeline.set_filter("Cooking");
        assert_eq!(pipeline.current_view(), View::Posts(Vec::new()));
    }

    #[test]
    fn test_search_then_clear_restores_view() {
        let mut pipeline = loaded(vec![
            sample("a", "Tech", &["ai"], "2024-01-01"),
            sample("b", "Tech", &[], "2024-06-01"),
            sample("c", "Life", &[], "2024-03-01"),
        ]);
        pipeline.set_filter("tech");
        pipeline.set_sort(SortMode::DateAsc);
        let before = pipeline.current_view().ids().join(",");

        pipeline.set_search("ai");
        assert_eq!(pipeline.current_view().ids(), vec!["a"]);

        pipeline.set_search("   ");
        assert_eq!(pipeline.state().search, "");
        assert_eq!(pipeline.current_view().ids().join(","), before);
    }

    #[test]
    fn test_filter_and_search_are_anded() {
        let mut pipeline = loaded(vec![
            sample("a", "Tech", &["ai"], "2024-01-01"),
            sample("b", "Life", &["ai"], "2024-02-01"),
            sample("c", "Tech", &[], "2024-03-01"),
        ]);
        pipeline.set_search("AI ");
        pipeline.set_filter("Tech");
        assert_eq!(pipeline.current_view().ids(), vec!["a"]);
    }

    #[test]
    fn test_search_matches_title_excerpt_and_tag_substrings() {
        let mut first = sample("a", "Tech", &[], "2024-01-01");
        first.title = "Writing a Parser".to_string();
        let mut second = sample("b", "Tech", &[], "2024-02-01");
        second.excerpt = "A tour of PARSING tools".to_string();
        let third = sample("c", "Tech", &["parsers"], "2024-03-01");
        let fourth = sample("d", "Parsing", &[], "2024-04-01");

        let mut pipeline = loaded(vec![first, second, third, fourth]);
        pipeline.set_search("pars");
        assert_eq!(pipeline.current_view().ids(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_orders_by_calendar_date() {
        let mut pipeline = loaded(vec![
            sample("mid", "Tech", &[], "2024-06-15"),
            sample("last", "Tech", &[], "2024-12-31"),
            sample("first", "Tech", &[], "2024-01-01"),
        ]);

        assert_eq!(pipeline.current_view().ids(), vec!["last", "mid", "first"]);

        pipeline.set_sort(SortMode::DateAsc);
        assert_eq!(pipeline.current_view().ids(), vec!["first", "mid", "last"]);
    }

    #[test]
    fn test_sort_parses_dates_before_comparing() {
        // Lexically "2024-10-1" < "2024-9-30"; by calendar it is later.
        let mut pipeline = loaded(vec![
            sample("oct", "Tech", &[], "2024-10-1"),
            sample("sep", "Tech", &[], "2024-9-30"),
            sample("jan", "Tech", &[], "2024-01-05"),
        ]);
        pipeline.set_sort(SortMode::DateAsc);
        assert_eq!(pipeline.current_view().ids(), vec!["jan", "sep", "oct"]);
    }

    #[test]
    fn test_sort_handles_mixed_date_formats() {
        let mut pipeline = loaded(vec![
            sample("jan", "Tech", &[], "2024-01-01"),
            sample("feb", "Tech", &[], "2024/02/01"),
            sample("jan5", "Tech", &[], "2024-01-05 10:00"),
            sample("mar", "Tech", &[], "20240301"),
            sample("dec", "Tech", &[], "2023-12-31"),
        ]);
        assert_eq!(
            pipeline.current_view().ids(),
            vec!["mar", "feb", "jan5", "jan", "dec"]
        );

        pipeline.set_sort(SortMode::DateAsc);
        assert_eq!(
            pipeline.current_view().ids(),
            vec!["dec", "jan", "jan5", "feb", "mar"]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let posts = vec![
            sample("x", "Tech", &[], "2024-05-01"),
            sample("y", "Tech", &[], "2024-5-1"),
            sample("z", "Tech", &[], "2024-05-01"),
            sample("old", "Tech", &[], "2023-01-01"),
        ];
        let mut pipeline = loaded(posts);
        assert_eq!(pipeline.current_view().ids(), vec!["x", "y", "z", "old"]);

        pipeline.set_sort(SortMode::DateAsc);
        assert_eq!(pipeline.current_view().ids(), vec!["old", "x", "y", "z"]);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let mut pipeline = loaded(vec![
            sample("u1", "Tech", &[], "unknown"),
            sample("d1", "Tech", &[], "2024-01-01"),
            sample("u2", "Tech", &[], ""),
            sample("d2", "Tech", &[], "2024-02-01"),
        ]);
        assert_eq!(pipeline.current_view().ids(), vec!["d2", "d1", "u1", "u2"]);

        pipeline.set_sort(SortMode::DateAsc);
        assert_eq!(pipeline.current_view().ids(), vec!["d1", "d2", "u1", "u2"]);
    }

    #[test]
    fn test_repeated_calls_are_idempotent() {
        let mut pipeline = loaded(vec![
            sample("a", "Tech", &[], "2024-01-01"),
            sample("b", "Tech", &[], "2024-02-01"),
            sample("c", "Life", &[], "2024-03-01"),
        ]);

        pipeline.set_sort(SortMode::DateAsc);
        let once = pipeline.current_view().ids().join(",");
        pipeline.set_sort(SortMode::DateAsc);
        assert_eq!(pipeline.current_view().ids().join(","), once);

        pipeline.set_filter("Tech");
        let filtered = pipeline.current_view().ids().join(",");
        pipeline.set_filter("Tech");
        assert_eq!(pipeline.current_view().ids().join(","), filtered);
    }

    #[test]
    fn test_selections_before_load_apply_after_install() {
        let mut pipeline = BlogPipeline::new();
        pipeline.set_filter("tech");
        pipeline.set_sort(SortMode::DateAsc);
        assert_eq!(pipeline.current_view(), View::NotLoaded);

        pipeline.install(vec![
            sample("b", "Tech", &[], "2024-06-01"),
            sample("c", "Life", &[], "2024-01-01"),
            sample("a", "Tech", &[], "2024-01-01"),
        ]);
        assert_eq!(pipeline.current_view().ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_default_sort_from_options() {
        let mut pipeline = BlogPipeline::with_options(PipelineOptions {
            default_sort: SortMode::DateAsc,
            ..PipelineOptions::default()
        });
        pipeline.install(scenario_posts());
        assert_eq!(pipeline.current_view().ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_categories_and_topics() {
        let pipeline = loaded(vec![
            sample("a", "Tech", &["rust", "ai"], "2024-01-01"),
            sample("b", "life", &["Rust"], "2024-02-01"),
            sample("c", "Tech", &[], "2024-03-01"),
        ]);
        assert_eq!(pipeline.categories(), vec!["life", "Tech"]);
        assert_eq!(pipeline.topics(), vec!["ai", "life", "rust", "Tech"]);
    }

    #[test]
    fn test_categories_differing_only_in_case_are_one_entry() {
        let mut pipeline = loaded(vec![
            sample("a", "Tech", &[], "2024-01-01"),
            sample("b", "Life", &[], "2024-02-01"),
            sample("c", "tech", &[], "2024-03-01"),
        ]);
        assert_eq!(pipeline.categories(), vec!["Life", "Tech"]);
        assert_eq!(pipeline.posts_by_category("Tech").len(), 2);

        pipeline.set_filter("Tech");
        assert_eq!(pipeline.current_view().ids(), vec!["c", "a"]);
    }

    #[test]
    fn test_posts_by_category_ignores_view_state() {
        let mut pipeline = loaded(vec![
            sample("a", "Tech", &["rust"], "2024-01-01"),
            sample("b", "Rust", &[], "2024-02-01"),
            sample("c", "Life", &[], "2024-03-01"),
        ]);
        pipeline.set_search("nomatch");

        let ids: Vec<&str> = pipeline
            .posts_by_category("RUST")
            .iter()
            .map(|post| post.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_observers_repaint_on_every_change() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let mut pipeline = BlogPipeline::new();
        pipeline.subscribe(Box::new(Recorder(Rc::clone(&recorded))));

        pipeline.set_filter("tech");
        pipeline.install(scenario_posts());
        pipeline.set_filter("all");

        let recorded = recorded.borrow();
        assert_eq!(recorded.views.len(), 3);
        assert_eq!(recorded.views[0], None);
        assert_eq!(recorded.views[1], Some(vec!["a".to_string()]));
        assert_eq!(
            recorded.views[2],
            Some(vec!["b".to_string(), "a".to_string()])
        );
    }

    #[tokio::test]
    async fn test_failed_load_stays_unloaded_and_reports_once() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("posts.json");
        fs::write(&index_path, r#"{"articles": []}"#).unwrap();

        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let mut pipeline = BlogPipeline::new();
        pipeline.subscribe(Box::new(Recorder(Rc::clone(&recorded))));

        let result = pipeline
            .load(&PostSource::File(index_path), &LoadOptions::default())
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::Shape);
        assert!(!pipeline.is_loaded());
        assert!(pipeline.current_view().is_empty());
        assert_eq!(pipeline.current_view(), View::NotLoaded);

        let recorded = recorded.borrow();
        assert_eq!(recorded.errors, vec![LoadErrorKind::Shape]);
        assert!(recorded.views.is_empty());
    }

    #[tokio::test]
    async fn test_successful_load_installs_posts() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("posts.json");
        let body = serde_json::json!({ "posts": scenario_posts() });
        fs::write(&index_path, body.to_string()).unwrap();

        let mut pipeline = BlogPipeline::new();
        let count = pipeline
            .load(&PostSource::File(index_path), &LoadOptions::default())
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(pipeline.current_view().ids(), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_mode_parse_and_display() {
        assert_eq!("date-desc".parse::<SortMode>().unwrap(), SortMode::DateDesc);
        assert_eq!("Date-Asc".parse::<SortMode>().unwrap(), SortMode::DateAsc);
        assert!("title".parse::<SortMode>().is_err());
        assert_eq!(SortMode::DateAsc.to_string(), "date-asc");
    }
}
