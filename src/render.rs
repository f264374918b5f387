use std::fmt;
use std::str::FromStr;

use askama::Template;
use chrono::{DateTime, Utc};

use crate::model::Item;
use crate::sanitize::safe_color;
use crate::store::DataStore;
use crate::time_ago::time_ago;

const BRAZIL_FLAG: &str = "🇧🇷";

/// Which renderer a navigation entry dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    News,
    Reddit,
    Podcast,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::News => "news",
            ViewKind::Reddit => "reddit",
            ViewKind::Podcast => "podcast",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = UnknownViewKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news" => Ok(ViewKind::News),
            "reddit" => Ok(ViewKind::Reddit),
            "podcast" => Ok(ViewKind::Podcast),
            other => Err(UnknownViewKind(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown view type: {0}")]
pub struct UnknownViewKind(pub String);

// Fields hold raw data-sourced text; the templates escape on output.

#[derive(Template)]
#[template(path = "content.html")]
pub struct ContentTemplate {
    pub heading: String,
    pub articles: Vec<ArticleView>,
}

#[derive(Template)]
#[template(path = "message.html")]
pub struct MessageTemplate {
    pub heading: Option<String>,
    pub text: String,
}

#[derive(Template)]
#[template(path = "tooltip.html")]
pub struct TooltipTemplate {
    pub summary: String,
    pub link: String,
}

pub struct ArticleView {
    pub time_ago: Option<String>,
    pub source: Option<SourceTag>,
    pub title: String,
    pub link: String,
    pub summary: String,
    pub tooltip_href: String,
}

pub struct SourceTag {
    pub color: String,
    pub name: String,
}

impl ArticleView {
    fn new(item: &Item, with_source: bool, now: DateTime<Utc>) -> Self {
        let source = with_source.then(|| SourceTag {
            color: safe_color(item.color.as_deref()).to_string(),
            name: item.source_name.clone().unwrap_or_default(),
        });
        let link = item.link.clone().unwrap_or_default();
        let summary = item.summary.clone().unwrap_or_default();

        Self {
            time_ago: item
                .published
                .as_deref()
                .map(|published| time_ago(Some(published), now)),
            source,
            title: item.title.clone().unwrap_or_default(),
            tooltip_href: tooltip_href(&summary, &link),
            link,
            summary,
        }
    }
}

/// Fragment URL the page fetches when the tooltip delay elapses on a title.
pub fn tooltip_href(summary: &str, link: &str) -> String {
    let pairs = [("summary", summary), ("link", link)];
    let query = serde_urlencoded::to_string(pairs.as_slice()).unwrap_or_default();
    format!("/tooltip?{}", query)
}

fn heading_only(text: &str) -> askama::Result<String> {
    ContentTemplate {
        heading: text.to_string(),
        articles: Vec::new(),
    }
    .render()
}

fn articles(items: &[&Item], with_source: bool, now: DateTime<Utc>) -> Vec<ArticleView> {
    items
        .iter()
        .map(|item| ArticleView::new(item, with_source, now))
        .collect()
}

/// Label shown for a news category; Brazil gets its flag.
pub fn news_label(category: &str) -> String {
    if category == "Brazil" {
        format!("{} {}", BRAZIL_FLAG, category)
    } else {
        category.to_string()
    }
}

/// Heading shown above a Reddit tag's posts.
pub fn reddit_heading(tag: &str) -> String {
    match tag {
        "br" => format!("{} Brazil Reddit", BRAZIL_FLAG),
        "jobs" => "Security Jobs".to_string(),
        other => other.to_string(),
    }
}

pub fn render_news(store: &DataStore, category: &str, now: DateTime<Utc>) -> askama::Result<String> {
    let items = match store.news_items(category) {
        Some(items) if !items.is_empty() => items,
        _ => return heading_only("No news found."),
    };

    ContentTemplate {
        heading: news_label(category),
        articles: articles(&items, true, now),
    }
    .render()
}

pub fn render_reddit(store: &DataStore, tag: &str, now: DateTime<Utc>) -> askama::Result<String> {
    let posts = store.reddit_items(tag);
    if posts.is_empty() {
        return heading_only("No Reddit posts found.");
    }

    ContentTemplate {
        heading: reddit_heading(tag),
        articles: articles(&posts, true, now),
    }
    .render()
}

/// Podcast episodes carry no source tag: the show is the only source.
pub fn render_podcasts(store: &DataStore, show: &str, now: DateTime<Utc>) -> askama::Result<String> {
    let Some(episodes) = store.podcast_episodes(show) else {
        return heading_only("No episodes found.");
    };

    ContentTemplate {
        heading: show.to_string(),
        articles: articles(&episodes, false, now),
    }
    .render()
}

/// Render the content pane for a selection.
pub fn render_view(
    store: &DataStore,
    kind: ViewKind,
    category: &str,
    now: DateTime<Utc>,
) -> askama::Result<String> {
    match kind {
        ViewKind::News => render_news(store, category, now),
        ViewKind::Reddit => render_reddit(store, category, now),
        ViewKind::Podcast => render_podcasts(store, category, now),
    }
}

pub fn render_message(heading: Option<&str>, text: &str) -> askama::Result<String> {
    MessageTemplate {
        heading: heading.map(str::to_string),
        text: text.to_string(),
    }
    .render()
}

/// Tooltip body for a hovered title. Nothing is shown without a summary.
pub fn render_tooltip(summary: &str, link: &str) -> askama::Result<Option<String>> {
    if summary.is_empty() {
        return Ok(None);
    }
    TooltipTemplate {
        summary: summary.to_string(),
        link: link.to_string(),
    }
    .render()
    .map(Some)
}
