//! Session state and navigation affordances

use serde::Serialize;

use super::account::{Account, Role};
use super::result::{Error, Result};

/// Coarse authentication state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Anonymous,
    AuthenticatedUser,
    AuthenticatedAdmin,
}

/// The signed-in account, if any
///
/// Passed explicitly to every handler that needs to know who is acting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current_user: Option<Account>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user: Account) -> Self {
        Self {
            current_user: Some(user),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn current_user(&self) -> Option<&Account> {
        self.current_user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user.as_ref().map(|u| u.role)
    }

    pub fn state(&self) -> SessionState {
        match self.role() {
            None => SessionState::Anonymous,
            Some(Role::User) => SessionState::AuthenticatedUser,
            Some(Role::Admin) => SessionState::AuthenticatedAdmin,
        }
    }

    /// The signed-in account, or an authorization error
    pub fn require_login(&self) -> Result<&Account> {
        self.current_user
            .as_ref()
            .ok_or_else(|| Error::authorization("sign in required"))
    }

    /// The signed-in admin account, or an authorization error
    pub fn require_admin(&self) -> Result<&Account> {
        let user = self.require_login()?;
        if !user.is_admin() {
            return Err(Error::authorization("admin role required"));
        }
        Ok(user)
    }
}

/// What the navigation bar shows for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavAffordances {
    pub guest_links: bool,
    pub user_menu: bool,
    pub admin_links: bool,
    pub display_name: Option<String>,
}

impl NavAffordances {
    pub fn for_session(session: &Session) -> Self {
        match session.current_user() {
            Some(user) => Self {
                guest_links: false,
                user_menu: true,
                admin_links: user.is_admin(),
                display_name: Some(user.first_name.clone()),
            },
            None => Self {
                guest_links: true,
                user_menu: false,
                admin_links: false,
                display_name: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> Account {
        Account::new("Grace", "Hopper", "grace@example.com", "secret1", role)
    }

    #[test]
    fn test_states() {
        assert_eq!(Session::anonymous().state(), SessionState::Anonymous);
        assert_eq!(Session::for_user(user(Role::User)).state(), SessionState::AuthenticatedUser);
        assert_eq!(Session::for_user(user(Role::Admin)).state(), SessionState::AuthenticatedAdmin);
    }

    #[test]
    fn test_require_admin() {
        assert!(matches!(Session::anonymous().require_admin(), Err(Error::Authorization(_))));
        assert!(Session::for_user(user(Role::User)).require_admin().is_err());
        assert!(Session::for_user(user(Role::Admin)).require_admin().is_ok());
    }

    #[test]
    fn test_affordances_follow_role() {
        let guest = NavAffordances::for_session(&Session::anonymous());
        assert!(guest.guest_links && !guest.user_menu && !guest.admin_links);

        let member = NavAffordances::for_session(&Session::for_user(user(Role::User)));
        assert!(!member.guest_links && member.user_menu && !member.admin_links);
        assert_eq!(member.display_name.as_deref(), Some("Grace"));

        let admin = NavAffordances::for_session(&Session::for_user(user(Role::Admin)));
        assert!(admin.admin_links);
    }
}
