//! Recording view hooks
//!
//! The core only signals what to render. This adapter queues those
//! signals so a renderer (the CLI, or a test) can drain and act on them
//! once the command that produced them has finished.

use std::sync::Mutex;

use serde::Serialize;

use crate::domain::{NavAffordances, Route, View};
use crate::ports::ViewHooks;

/// One rendering signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    PageRendered { page: Route },
    ViewRefreshed { view: View },
    NavigationUpdated { nav: NavAffordances },
}

/// View hooks that queue every signal in order
#[derive(Default)]
pub struct RecordingViews {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all queued events, oldest first
    pub fn drain(&self) -> Vec<ViewEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Copy of the queued events without clearing them
    pub fn events(&self) -> Vec<ViewEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Pages rendered so far, in order
    pub fn rendered_pages(&self) -> Vec<Route> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::PageRendered { page } => Some(page),
                _ => None,
            })
            .collect()
    }

    /// Views refreshed so far, in order
    pub fn refreshed_views(&self) -> Vec<View> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::ViewRefreshed { view } => Some(view),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ViewEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl ViewHooks for RecordingViews {
    fn render_page(&self, page: Route) {
        self.push(ViewEvent::PageRendered { page });
    }

    fn refresh_view(&self, view: View) {
        self.push(ViewEvent::ViewRefreshed { view });
    }

    fn update_navigation(&self, nav: &NavAffordances) {
        self.push(ViewEvent::NavigationUpdated { nav: nav.clone() });
    }
}
