use std::sync::Arc;

use askama_axum::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::bootstrap::Board;
use crate::controller::{Selection, TooltipSettings};
use crate::render::{render_tooltip, UnknownViewKind, ViewKind};

pub struct AppState {
    pub board: Arc<Board>,
    pub tooltip: TooltipSettings,
}

// Template structs. `sidebar` and `content` are rendered fragments.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub sidebar: String,
    pub content: String,
    pub tooltip_delay_ms: u128,
    pub tooltip_offset: i32,
}

/// Content pane plus an out-of-band sidebar swap that moves the active marker.
#[derive(Template)]
#[template(path = "view.html")]
pub struct ViewTemplate {
    pub sidebar: String,
    pub content: String,
}

// Custom error type
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<UnknownViewKind>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, format!("Error: {}", self.0)).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
}

impl PageQuery {
    pub fn selection(&self) -> Result<Option<Selection>, UnknownViewKind> {
        match &self.kind {
            Some(kind) => Ok(Some(Selection {
                kind: kind.parse::<ViewKind>()?,
                category: self.category.clone().unwrap_or_default(),
            })),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct TooltipQuery {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub link: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/view", get(view))
        .route("/tooltip", get(tooltip))
        .route("/health", get(health))
        .with_state(state)
}

// Route handlers
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let requested = query.selection()?;
    let page = state.board.page(requested, Utc::now())?;

    Ok(IndexTemplate {
        sidebar: page.sidebar,
        content: page.content,
        tooltip_delay_ms: state.tooltip.delay.as_millis(),
        tooltip_offset: state.tooltip.offset,
    })
}

pub async fn view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Result<impl IntoResponse, AppError> {
    let selection = Selection {
        kind: query.kind.parse::<ViewKind>()?,
        category: query.category,
    };
    let page = state.board.page(Some(selection), Utc::now())?;

    Ok(ViewTemplate {
        sidebar: page.sidebar,
        content: page.content,
    })
}

pub async fn tooltip(Query(query): Query<TooltipQuery>) -> Result<impl IntoResponse, AppError> {
    let html = render_tooltip(&query.summary, &query.link)?.unwrap_or_default();
    Ok(Html(html))
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
