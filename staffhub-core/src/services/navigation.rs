//! Navigation controller - session state and page routing
//!
//! Holds who is signed in and which page is active. Every navigation
//! request resolves to exactly one page: requests the session may not
//! make are redirected to the login page instead of failing.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Access, Account, NavAffordances, Route, Session, SessionState};
use crate::ports::ViewHooks;

/// Why a navigation request was redirected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    LoginRequired,
    AdminOnly,
}

/// Outcome of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub requested: Route,
    pub page: Route,
    pub denial: Option<Denial>,
}

impl Navigation {
    pub fn redirected(&self) -> bool {
        self.denial.is_some()
    }

    /// The active page, or an authorization error if the request was redirected
    pub fn into_result(self) -> Result<Route> {
        match self.denial {
            None => Ok(self.page),
            Some(Denial::LoginRequired) => Err(Error::authorization(format!(
                "sign in to open {}",
                self.requested.hash()
            ))),
            Some(Denial::AdminOnly) => Err(Error::authorization(format!(
                "{} is for administrators",
                self.requested.hash()
            ))),
        }
    }
}

/// A navigation waiting for its time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledNavigation {
    pub route: Route,
    pub due_at: Instant,
}

/// Session and page state machine
///
/// States are {anonymous, user, admin} × current page.
pub struct NavigationController {
    session: Session,
    current: Route,
    scheduled: Option<ScheduledNavigation>,
    views: Arc<dyn ViewHooks>,
}

impl NavigationController {
    /// Start anonymous on the home page; nothing is rendered until the first navigation
    pub fn new(views: Arc<dyn ViewHooks>) -> Self {
        Self {
            session: Session::anonymous(),
            current: Route::Home,
            scheduled: None,
            views,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn current_page(&self) -> Route {
        self.current
    }

    pub fn scheduled(&self) -> Option<&ScheduledNavigation> {
        self.scheduled.as_ref()
    }

    /// Set the session and publish the matching navigation affordances
    ///
    /// `authenticated` without a user collapses to anonymous: there is no
    /// role to derive the affordances from.
    pub fn set_auth_state(&mut self, authenticated: bool, user: Option<Account>) -> NavAffordances {
        self.session = match (authenticated, user) {
            (true, Some(user)) => Session::for_user(user),
            _ => Session::anonymous(),
        };
        let nav = NavAffordances::for_session(&self.session);
        self.views.update_navigation(&nav);
        nav
    }

    /// Which page a request for `route` ends up on
    pub fn resolve(&self, route: Route) -> (Route, Option<Denial>) {
        match route.access() {
            Access::Public => (route, None),
            Access::Authenticated if !self.session.is_logged_in() => {
                (Route::Login, Some(Denial::LoginRequired))
            }
            Access::Authenticated => (route, None),
            Access::Admin if !self.session.is_logged_in() => {
                (Route::Login, Some(Denial::LoginRequired))
            }
            Access::Admin if self.session.require_admin().is_err() => {
                (Route::Login, Some(Denial::AdminOnly))
            }
            Access::Admin => (route, None),
        }
    }

    /// Activate a page, redirecting when the session may not open it
    pub fn navigate_to(&mut self, route: Route) -> Navigation {
        let (page, denial) = self.resolve(route);
        self.activate(page);
        Navigation {
            requested: route,
            page,
            denial,
        }
    }

    /// Navigate to the page named by a hash fragment; unknown fragments go home
    pub fn navigate_hash(&mut self, fragment: &str) -> Navigation {
        self.navigate_to(Route::from_hash(fragment).unwrap_or(Route::Home))
    }

    /// Restore the page encoded in a location (on load or history navigation)
    pub fn restore_location(&mut self, location: &str) -> Navigation {
        self.navigate_to(Route::from_location(location))
    }

    /// Re-run the refresh hooks of the active page
    pub fn refresh_current(&self) {
        for view in self.current.refreshes() {
            self.views.refresh_view(*view);
        }
    }

    /// Navigate to `route` once `delay` has passed since `now`
    ///
    /// Replaces any navigation already waiting.
    pub fn schedule(&mut self, route: Route, delay: Duration, now: Instant) {
        self.scheduled = Some(ScheduledNavigation {
            route,
            due_at: now + delay,
        });
    }

    /// Perform the scheduled navigation if it is due
    pub fn run_due(&mut self, now: Instant) -> Option<Navigation> {
        match self.scheduled {
            Some(pending) if pending.due_at <= now => {
                self.scheduled = None;
                Some(self.navigate_to(pending.route))
            }
            _ => None,
        }
    }

    fn activate(&mut self, page: Route) {
        self.current = page;
        self.views.render_page(page);
        self.refresh_current();
    }
}
