//! Post records as they appear in the blog index.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// One blog entry from the post index.
///
/// Every field except `body` must be present in the source document.
/// Values are taken verbatim; `id` uniqueness is the publisher's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Calendar date, normally `YYYY-MM-DD`.
    pub date: String,
    pub excerpt: String,
    #[serde(rename = "readTime")]
    pub read_time: String,
    /// Full post body (not used by the list view).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Post {
    /// Returns the post date as a calendar date, if it parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_post_date(&self.date)
    }

    /// Long US-English date for display, e.g. `January 5, 2024`.
    ///
    /// Falls back to the raw `date` string when it does not parse.
    pub fn display_date(&self) -> String {
        self.parsed_date().map_or_else(
            || self.date.clone(),
            |date| date.format("%B %-d, %Y").to_string(),
        )
    }

    /// Returns true if `name` equals the category (case-insensitive), or any
    /// tag when `include_tags` is set.
    pub fn matches_topic(&self, name: &str, include_tags: bool) -> bool {
        let name = name.to_lowercase();
        if self.category.to_lowercase() == name {
            return true;
        }
        include_tags && self.tags.iter().any(|tag| tag.to_lowercase() == name)
    }

    /// Returns true if the already-lowercased `term` occurs in the title,
    /// excerpt or any tag.
    pub fn matches_search(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(term)
            || self.excerpt.to_lowercase().contains(term)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(term))
    }
}

/// Parses a post date into a calendar date.
///
/// Accepts `YYYY-MM-DD` or `YYYY/MM/DD` with or without zero padding, the
/// basic `YYYYMMDD` form, and timestamps whose time part follows a `T` or a
/// space (the date part is kept). Anything else yields `None`.
pub fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }

    let date_part = trimmed.split(['T', ' ']).next()?;
    if date_part.len() == 8 && date_part.bytes().all(|b| b.is_ascii_digit()) {
        let year = date_part[..4].parse::<i32>().ok()?;
        let month = date_part[4..6].parse::<u32>().ok()?;
        let day = date_part[6..].parse::<u32>().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    // One separator per date; `2024-01/05` is rejected.
    let separator = if date_part.contains('/') { '/' } else { '-' };
    let mut parts = date_part.splitn(3, separator);
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
pub(crate) fn sample(id: &str, category: &str, tags: &[&str], date: &str) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Post {id}"),
        category: category.to_string(),
        tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        date: date.to_string(),
        excerpt: format!("Excerpt for {id}"),
        read_time: "3 min read".to_string(),
        body: None,
    }
}
