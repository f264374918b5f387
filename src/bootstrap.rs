use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::config::DataSource;
use crate::controller::{Controller, Effect, Event, Selection, TooltipSettings};
use crate::error::LoadError;
use crate::model::Document;
use crate::render::{render_message, ViewKind};
use crate::sidebar::{build_sidebar, Sidebar};
use crate::store::DataStore;

pub const LOAD_ERROR_TEXT: &str = "Could not load `data.json`. Please run the fetcher script and check the `fetcher.log` for errors.";

pub const NO_CONTENT_TEXT: &str = "No content available. Please run the fetcher and check logs.";

pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent("NewsBoard/1.0")
        .build()
}

/// Fetch and parse the data document. One attempt, no retries.
pub async fn load_document(source: &DataSource, client: &Client) -> Result<Document, LoadError> {
    let bytes = match source {
        DataSource::Url(url) => {
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status(status.as_u16()));
            }
            response.bytes().await?.to_vec()
        }
        DataSource::File(path) => tokio::fs::read(path).await?,
    };

    Document::from_slice(&bytes)
}

/// The three panes of a rendered page, minus the (initially empty) tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub sidebar: String,
    pub content: String,
    pub active: Option<Selection>,
}

/// Session state after the single load attempt.
#[derive(Debug)]
pub enum Board {
    Loaded {
        store: Arc<DataStore>,
        sidebar: Sidebar,
        default: Option<Selection>,
    },
    Failed,
}

impl Board {
    pub fn from_result(result: Result<Document, LoadError>) -> Self {
        let document = match result {
            Ok(document) => document,
            Err(e) => {
                error!("Failed to load data: {}", e);
                return Board::Failed;
            }
        };

        let total = document.item_count();
        let store = DataStore::new(document);
        let valid = store
            .document()
            .news
            .values()
            .chain(store.document().podcasts.values())
            .flatten()
            .filter(|item| item.is_valid())
            .count();
        if valid < total {
            debug!("Ignoring {} malformed items", total - valid);
        }

        let sidebar = build_sidebar(&store);
        let default = store
            .default_news_category()
            .map(|category| Selection::new(ViewKind::News, category));

        match &default {
            Some(selection) => info!("Default view: news/{}", selection.category),
            None => warn!("No news category with content, showing placeholder"),
        }

        Board::Loaded {
            store: Arc::new(store),
            sidebar,
            default,
        }
    }

    /// Render the full page for `requested`, or the default view when nothing
    /// was requested.
    pub fn page(&self, requested: Option<Selection>, now: DateTime<Utc>) -> askama::Result<Page> {
        let (store, sidebar, default) = match self {
            Board::Loaded {
                store,
                sidebar,
                default,
            } => (store, sidebar, default),
            Board::Failed => {
                return Ok(Page {
                    sidebar: String::new(),
                    content: render_message(Some("Error"), LOAD_ERROR_TEXT)?,
                    active: None,
                })
            }
        };

        let Some(selection) = requested.or_else(|| default.clone()) else {
            return Ok(Page {
                sidebar: sidebar.render(None)?,
                content: render_message(None, NO_CONTENT_TEXT)?,
                active: None,
            });
        };

        let mut controller = Controller::new(store.clone(), TooltipSettings::default());
        let mut active = None;
        let mut content = String::new();
        for effect in controller.handle(Event::NavClicked(selection), now)? {
            match effect {
                Effect::SetActive(selection) => active = Some(selection),
                Effect::ReplaceContent(markup) => content = markup,
                _ => {}
            }
        }

        Ok(Page {
            sidebar: sidebar.render(active.as_ref())?,
            content,
            active,
        })
    }
}

/// Load the document once and prepare the board.
pub async fn bootstrap(source: &DataSource, client: &Client) -> Board {
    info!("Loading data from {}", source);
    let result = load_document(source, client).await;
    if let Ok(document) = &result {
        info!(
            "Loaded {} news categories and {} podcast shows ({} items)",
            document.news.len(),
            document.podcasts.len(),
            document.item_count()
        );
    }
    Board::from_result(result)
}
