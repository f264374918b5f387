use askama::Template;
use indexmap::IndexMap;

use crate::controller::Selection;
use crate::render::{news_label, ViewKind};
use crate::store::DataStore;

/// One navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub kind: ViewKind,
    pub category: String,
    pub count: usize,
}

impl NavEntry {
    pub fn label(&self) -> String {
        match self.kind {
            ViewKind::News => news_label(&self.category),
            ViewKind::Reddit | ViewKind::Podcast => format!("{} ({})", self.category, self.count),
        }
    }

    /// Plain link target, so navigation also works without client script.
    pub fn href(&self) -> String {
        format!("/?{}", self.query())
    }

    /// Content-pane fragment swapped in place on click.
    pub fn view_href(&self) -> String {
        format!("/view?{}", self.query())
    }

    fn query(&self) -> String {
        let pairs = [
            ("type", self.kind.as_str()),
            ("category", self.category.as_str()),
        ];
        serde_urlencoded::to_string(pairs.as_slice()).unwrap_or_default()
    }

    fn matches(&self, selection: &Selection) -> bool {
        self.kind == selection.kind && self.category == selection.category
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSection {
    pub title: &'static str,
    pub entries: Vec<NavEntry>,
}

/// Navigation derived from the store: Reddit, News and Podcasts sections,
/// each omitted when it has no entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sidebar {
    pub sections: Vec<NavSection>,
}

#[derive(Template)]
#[template(path = "sidebar.html")]
struct SidebarTemplate {
    sections: Vec<SectionView>,
}

struct SectionView {
    title: &'static str,
    entries: Vec<EntryView>,
}

struct EntryView {
    href: String,
    view_href: String,
    kind: ViewKind,
    category: String,
    label: String,
    active: bool,
}

pub fn build_sidebar(store: &DataStore) -> Sidebar {
    let document = store.document();
    let mut sections = Vec::new();

    // Reddit tags keep the order they are first seen in.
    let mut reddit: IndexMap<&str, usize> = IndexMap::new();
    for item in document.news.values().flatten() {
        if !(item.is_valid() && item.is_reddit()) {
            continue;
        }
        if let Some(tag) = item.category.as_deref().filter(|tag| !tag.is_empty()) {
            *reddit.entry(tag).or_insert(0) += 1;
        }
    }
    push_section(
        &mut sections,
        "Reddit",
        reddit
            .into_iter()
            .map(|(tag, count)| entry(ViewKind::Reddit, tag, count))
            .collect(),
    );

    let mut categories: Vec<&String> = document.news.keys().collect();
    categories.sort();
    let news = categories
        .into_iter()
        .filter_map(|category| {
            let count = store.news_items(category).map_or(0, |items| items.len());
            (count > 0).then(|| entry(ViewKind::News, category, count))
        })
        .collect();
    push_section(&mut sections, "News", news);

    let mut shows: Vec<&String> = document.podcasts.keys().collect();
    shows.sort();
    let podcasts = shows
        .into_iter()
        .filter_map(|show| {
            let count = store.podcast_episodes(show).map_or(0, |episodes| episodes.len());
            (count > 0).then(|| entry(ViewKind::Podcast, show, count))
        })
        .collect();
    push_section(&mut sections, "Podcasts", podcasts);

    Sidebar { sections }
}

fn entry(kind: ViewKind, category: &str, count: usize) -> NavEntry {
    NavEntry {
        kind,
        category: category.to_string(),
        count,
    }
}

fn push_section(sections: &mut Vec<NavSection>, title: &'static str, entries: Vec<NavEntry>) {
    if !entries.is_empty() {
        sections.push(NavSection { title, entries });
    }
}

impl Sidebar {
    /// Render the navigation, marking the entry for `active` (if any).
    pub fn render(&self, active: Option<&Selection>) -> askama::Result<String> {
        let sections = self
            .sections
            .iter()
            .map(|section| SectionView {
                title: section.title,
                entries: section
                    .entries
                    .iter()
                    .map(|entry| EntryView {
                        href: entry.href(),
                        view_href: entry.view_href(),
                        kind: entry.kind,
                        category: entry.category.clone(),
                        label: entry.label(),
                        active: active.is_some_and(|selection| entry.matches(selection)),
                    })
                    .collect(),
            })
            .collect();

        SidebarTemplate { sections }.render()
    }
}
