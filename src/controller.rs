//! Interaction state machine for the board.
//!
//! Two independent concerns live here: which navigation entry is selected,
//! and the delayed tooltip shown while the pointer rests on an article title.
//! [`Controller::handle`] is pure with respect to time and I/O: it consumes an
//! [`Event`] and returns the [`Effect`]s the surface must apply. [`run`] is
//! the async driver that owns the tooltip timer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::render::{render_tooltip, render_view, ViewKind};
use crate::store::DataStore;

/// The active navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub kind: ViewKind,
    pub category: String,
}

impl Selection {
    pub fn new(kind: ViewKind, category: &str) -> Self {
        Self {
            kind,
            category: category.to_string(),
        }
    }
}

/// Raw tooltip data carried by an article title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRef {
    pub summary: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    NavClicked(Selection),
    ClickedOutside,
    PointerEnter(TitleRef),
    PointerLeave,
    PointerMove { x: i32, y: i32 },
    TooltipElapsed { generation: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetActive(Selection),
    ReplaceContent(String),
    StartTooltipTimer { generation: u64, delay: Duration },
    CancelTooltipTimer { generation: u64 },
    ShowTooltip(String),
    HideTooltip,
    MoveTooltip { left: i32, top: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipSettings {
    pub delay: Duration,
    pub offset: i32,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            offset: 15,
        }
    }
}

#[derive(Debug, Default)]
struct TooltipState {
    pending: Option<(u64, TitleRef)>,
    visible: bool,
}

pub struct Controller {
    store: Arc<DataStore>,
    settings: TooltipSettings,
    selection: Option<Selection>,
    tooltip: TooltipState,
    next_generation: u64,
}

impl Controller {
    pub fn new(store: Arc<DataStore>, settings: TooltipSettings) -> Self {
        Self {
            store,
            settings,
            selection: None,
            tooltip: TooltipState::default(),
            next_generation: 0,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn tooltip_visible(&self) -> bool {
        self.tooltip.visible
    }

    pub fn handle(&mut self, event: Event, now: DateTime<Utc>) -> askama::Result<Vec<Effect>> {
        match event {
            Event::NavClicked(selection) => self.select(selection, now),
            Event::ClickedOutside => Ok(Vec::new()),
            Event::PointerEnter(target) => Ok(self.pointer_enter(target)),
            Event::PointerLeave => Ok(self.pointer_leave()),
            Event::PointerMove { x, y } => Ok(self.pointer_move(x, y)),
            Event::TooltipElapsed { generation } => self.tooltip_elapsed(generation),
        }
    }

    fn select(&mut self, selection: Selection, now: DateTime<Utc>) -> askama::Result<Vec<Effect>> {
        let content = render_view(&self.store, selection.kind, &selection.category, now)?;
        self.selection = Some(selection.clone());
        Ok(vec![Effect::SetActive(selection), Effect::ReplaceContent(content)])
    }

    fn pointer_enter(&mut self, target: TitleRef) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some((generation, _)) = self.tooltip.pending.take() {
            effects.push(Effect::CancelTooltipTimer { generation });
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        self.tooltip.pending = Some((generation, target));
        effects.push(Effect::StartTooltipTimer {
            generation,
            delay: self.settings.delay,
        });
        effects
    }

    fn pointer_leave(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some((generation, _)) = self.tooltip.pending.take() {
            effects.push(Effect::CancelTooltipTimer { generation });
        }
        if self.tooltip.visible {
            self.tooltip.visible = false;
            effects.push(Effect::HideTooltip);
        }
        effects
    }

    fn pointer_move(&self, x: i32, y: i32) -> Vec<Effect> {
        if !self.tooltip.visible {
            return Vec::new();
        }
        vec![Effect::MoveTooltip {
            left: x.saturating_add(self.settings.offset),
            top: y.saturating_add(self.settings.offset),
        }]
    }

    // A timer that was cancelled or superseded reports a stale generation.
    fn tooltip_elapsed(&mut self, generation: u64) -> askama::Result<Vec<Effect>> {
        let target = match self.tooltip.pending.take() {
            Some((current, target)) if current == generation => target,
            other => {
                self.tooltip.pending = other;
                return Ok(Vec::new());
            }
        };

        match render_tooltip(&target.summary, &target.link)? {
            Some(html) => {
                self.tooltip.visible = true;
                Ok(vec![Effect::ShowTooltip(html)])
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Drive a controller from an event channel until it closes.
///
/// Tooltip timers run as sleeping tasks that post [`Event::TooltipElapsed`]
/// back to the driver; every other effect is forwarded to `effects`.
pub async fn run(
    mut controller: Controller,
    mut events: mpsc::Receiver<Event>,
    effects: mpsc::Sender<Effect>,
) -> askama::Result<()> {
    let (timer_tx, mut timer_rx) = mpsc::channel::<Event>(4);
    let mut timer: Option<(u64, JoinHandle<()>)> = None;

    loop {
        let event = tokio::select! {
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
            Some(event) = timer_rx.recv() => event,
        };

        for effect in controller.handle(event, Utc::now())? {
            match effect {
                Effect::StartTooltipTimer { generation, delay } => {
                    let tx = timer_tx.clone();
                    let handle = tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(Event::TooltipElapsed { generation }).await;
                    });
                    if let Some((_, previous)) = timer.replace((generation, handle)) {
                        previous.abort();
                    }
                }
                Effect::CancelTooltipTimer { generation } => {
                    if let Some((current, handle)) = timer.take() {
                        if current == generation {
                            handle.abort();
                        } else {
                            timer = Some((current, handle));
                        }
                    }
                }
                other => {
                    if effects.send(other).await.is_err() {
                        debug!("Effect receiver dropped, stopping interaction driver");
                        return Ok(());
                    }
                }
            }
        }
    }

    if let Some((_, handle)) = timer {
        handle.abort();
    }
    Ok(())
}
