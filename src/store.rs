use crate::model::{sort_newest_first, Document, Item};

/// Owns the loaded document for the lifetime of the board.
///
/// Lists are sorted once on construction and never written again, so the
/// store is shared read-only between request handlers.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    document: Document,
}

impl DataStore {
    pub fn new(mut document: Document) -> Self {
        document.sort_all();
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Valid non-Reddit items filed under a news category, or `None` when the
    /// category does not exist.
    pub fn news_items(&self, category: &str) -> Option<Vec<&Item>> {
        self.document.news.get(category).map(|items| {
            items
                .iter()
                .filter(|item| item.is_valid() && !item.is_reddit())
                .collect()
        })
    }

    /// Valid Reddit posts tagged `tag`, gathered from every news category and
    /// re-sorted newest first.
    pub fn reddit_items(&self, tag: &str) -> Vec<&Item> {
        let mut posts: Vec<&Item> = self
            .document
            .news
            .values()
            .flatten()
            .filter(|item| {
                item.is_valid() && item.is_reddit() && item.category.as_deref() == Some(tag)
            })
            .collect();
        sort_newest_first(&mut posts);
        posts
    }

    /// Valid episodes of a podcast show, or `None` when the show does not exist.
    pub fn podcast_episodes(&self, show: &str) -> Option<Vec<&Item>> {
        self.document
            .podcasts
            .get(show)
            .map(|episodes| episodes.iter().filter(|item| item.is_valid()).collect())
    }

    /// The lexicographically smallest news category holding at least one valid
    /// non-Reddit item.
    pub fn default_news_category(&self) -> Option<&str> {
        let mut categories: Vec<&String> = self.document.news.keys().collect();
        categories.sort();
        categories
            .into_iter()
            .find(|category| {
                self.document.news[category.as_str()]
                    .iter()
                    .any(|item| item.is_valid() && !item.is_reddit())
            })
            .map(String::as_str)
    }
}
