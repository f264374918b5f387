use std::borrow::Borrow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::LoadError;

/// Category or show name mapped to its items, in document order.
pub type Buckets = IndexMap<String, Vec<Item>>;

/// Item type tag marking a Reddit post.
pub const REDDIT_TYPE: &str = "reddit";

/// One news article, Reddit post or podcast episode.
///
/// Every field is optional: a field holding anything but a JSON string is
/// read as absent, and a non-object entry becomes an empty (invalid) item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub summary: Option<String>,
    pub source_name: Option<String>,
    pub color: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
}

impl Item {
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };
        let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_owned);

        Self {
            title: text("title"),
            link: text("link"),
            published: text("published"),
            summary: text("summary"),
            source_name: text("source_name"),
            color: text("color"),
            kind: text("type"),
            category: text("category"),
        }
    }

    /// An item is usable only when both `title` and `link` are strings.
    pub fn is_valid(&self) -> bool {
        self.title.is_some() && self.link.is_some()
    }

    pub fn is_reddit(&self) -> bool {
        self.kind.as_deref() == Some(REDDIT_TYPE)
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published.as_deref().and_then(parse_published)
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// The aggregated payload produced by the fetcher.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "lenient_buckets")]
    pub news: Buckets,
    #[serde(default, deserialize_with = "lenient_buckets")]
    pub podcasts: Buckets,
}

impl Document {
    /// Parse a payload, rejecting anything whose top level is not an object.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        if !value.is_object() {
            return Err(LoadError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Sort every news and podcast list newest first.
    pub fn sort_all(&mut self) {
        for items in self.news.values_mut().chain(self.podcasts.values_mut()) {
            sort_newest_first(items);
        }
    }

    pub fn item_count(&self) -> usize {
        self.news
            .values()
            .chain(self.podcasts.values())
            .map(Vec::len)
            .sum()
    }
}

// Non-object mappings read as empty, non-array buckets as empty lists.
fn lenient_buckets<'de, D>(deserializer: D) -> Result<Buckets, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(Buckets::new());
    };

    Ok(map
        .into_iter()
        .map(|(key, bucket)| {
            let items = match bucket {
                Value::Array(entries) => entries.iter().map(Item::from_value).collect(),
                _ => Vec::new(),
            };
            (key, items)
        })
        .collect())
}

/// Parse a published date as written by feeds: RFC 3339, RFC 2822, or a
/// naive ISO date/time taken as UTC.
pub fn parse_published(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

/// Stable sort, newest first. Items with a missing or unparsable date go last.
pub fn sort_newest_first<T: Borrow<Item>>(items: &mut [T]) {
    items.sort_by_cached_key(|item| {
        let published = item.borrow().published_at();
        (published.is_none(), std::cmp::Reverse(published))
    });
}
