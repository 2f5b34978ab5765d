//! Pages, their hash routes and access levels

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// A named page of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Home,
    Register,
    Verify,
    Login,
    Profile,
    Employees,
    Accounts,
    Departments,
    MyRequests,
}

/// Who may open a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

/// Data displayed on a page that can be refreshed independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Profile,
    VerifyNotice,
    Accounts,
    Departments,
    DepartmentOptions,
    Employees,
    MyRequests,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Home,
        Route::Register,
        Route::Verify,
        Route::Login,
        Route::Profile,
        Route::Employees,
        Route::Accounts,
        Route::Departments,
        Route::MyRequests,
    ];

    /// Page identifier, also the path segment of the hash route
    pub fn page_id(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Register => "register",
            Route::Verify => "verify",
            Route::Login => "login",
            Route::Profile => "profile",
            Route::Employees => "employees",
            Route::Accounts => "accounts",
            Route::Departments => "departments",
            Route::MyRequests => "my-requests",
        }
    }

    pub fn hash(&self) -> String {
        match self {
            Route::Home => "#/".to_string(),
            other => format!("#/{}", other.page_id()),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::Register | Route::Verify | Route::Login => Access::Public,
            Route::Profile | Route::MyRequests => Access::Authenticated,
            Route::Employees | Route::Accounts | Route::Departments => Access::Admin,
        }
    }

    /// Views refreshed whenever the page becomes active
    pub fn refreshes(&self) -> &'static [View] {
        match self {
            Route::Profile => &[View::Profile],
            Route::Verify => &[View::VerifyNotice],
            Route::Employees => &[View::Employees, View::DepartmentOptions],
            Route::Accounts => &[View::Accounts],
            Route::Departments => &[View::Departments],
            Route::MyRequests => &[View::MyRequests],
            Route::Home | Route::Register | Route::Login => &[],
        }
    }

    /// Resolve a hash fragment (`#/login`, `/login`, `login`)
    ///
    /// Returns `None` for fragments that do not name a page.
    pub fn from_hash(fragment: &str) -> Option<Route> {
        let path = fragment.trim().trim_start_matches('#').trim_start_matches('/');
        let path = path.split(['?', '/']).next().unwrap_or("");
        if path.is_empty() {
            return Some(Route::Home);
        }
        Route::ALL
            .into_iter()
            .find(|r| r.page_id().eq_ignore_ascii_case(path))
    }

    /// Resolve the page encoded in a full location or bare fragment
    ///
    /// Unknown or missing fragments fall back to the home page.
    pub fn from_location(location: &str) -> Route {
        let fragment = match Url::parse(location) {
            Ok(url) => url.fragment().unwrap_or("").to_string(),
            Err(_) => location.to_string(),
        };
        Route::from_hash(&fragment).unwrap_or(Route::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.page_id())
    }
}
