//! Auth service - registration, simulated verification, login and profile
//!
//! Nothing here is real authentication: passwords are compared in
//! plaintext and the "token" is the account's email.

use std::time::Instant;

use serde::Deserialize;

use super::directory::Directory;
use super::navigation::NavigationController;
use crate::config::Config;
use crate::domain::result::{Error, Result};
use crate::domain::{validate_email, validate_password, Account, Route};

/// Registration form fields
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Auth service for the current session
pub struct AuthService<'a> {
    directory: &'a mut Directory,
    navigator: &'a mut NavigationController,
    config: &'a Config,
}

impl<'a> AuthService<'a> {
    pub fn new(
        directory: &'a mut Directory,
        navigator: &'a mut NavigationController,
        config: &'a Config,
    ) -> Self {
        Self {
            directory,
            navigator,
            config,
        }
    }

    /// Register a new, unverified account and open the verify page
    ///
    /// The account gets the configured default role.
    pub fn register(&mut self, input: RegistrationInput) -> Result<Account> {
        let first_name = input.first_name.trim();
        let last_name = input.last_name.trim();
        let email = input.email.trim();

        if first_name.is_empty() || last_name.is_empty() {
            return Err(Error::validation("first and last name are required"));
        }
        validate_email(email)?;
        validate_password(&input.password, self.config.min_password_length)?;
        if self.directory.account_by_email(email).is_some() {
            return Err(Error::validation(format!("{} is already registered", email)));
        }

        let account = Account::new(
            first_name,
            last_name,
            email,
            input.password,
            self.config.default_role,
        );
        let account = self.directory.accounts.create(account)?;
        self.directory
            .persistence()
            .save_unverified_email(&account.email)?;
        self.navigator.navigate_to(Route::Verify);
        Ok(account)
    }

    /// Email waiting for simulated verification, if any
    pub fn pending_verification(&self) -> Result<Option<String>> {
        self.directory.persistence().unverified_email()
    }

    /// Simulate clicking the verification link
    ///
    /// Verifies `email`, or the pending email when none is given, then
    /// schedules the redirect to the login page.
    pub fn verify_email(&mut self, email: Option<&str>, now: Instant) -> Result<Account> {
        let pending = self.pending_verification()?;
        let email = match email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => email.to_string(),
            None => pending
                .clone()
                .ok_or_else(|| Error::not_found("no email is waiting for verification"))?,
        };

        let mut account = self
            .directory
            .account_by_email(&email)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("no account registered for {}", email)))?;

        if !account.verified {
            account.verified = true;
            account = self.directory.accounts.update(account.id, account)?;
        }

        if pending.is_some_and(|p| account.has_email(&p)) {
            self.directory.persistence().clear_unverified_email()?;
        }

        self.navigator
            .schedule(Route::Login, self.config.verify_redirect_delay, now);
        Ok(account)
    }

    /// Sign in and open the profile page
    ///
    /// On failure the session is left exactly as it was.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Account> {
        let account = self
            .directory
            .account_by_email(email)
            .filter(|a| a.password == password)
            .cloned()
            .ok_or_else(|| Error::authentication("invalid email or password"))?;

        if !account.verified {
            return Err(Error::authentication("email address has not been verified"));
        }

        self.directory.persistence().save_auth_token(&account.email)?;
        self.navigator.set_auth_state(true, Some(account.clone()));
        self.navigator.navigate_to(Route::Profile);
        Ok(account)
    }

    /// Sign out and return to the home page
    pub fn logout(&mut self) -> Result<()> {
        self.directory.persistence().clear_auth_token()?;
        self.navigator.set_auth_state(false, None);
        self.navigator.navigate_to(Route::Home);
        Ok(())
    }

    /// Re-establish the session saved by a previous run
    ///
    /// A token naming no account, or an unverified one, is discarded.
    pub fn restore_session(&mut self) -> Result<Option<Account>> {
        let Some(token) = self.directory.persistence().auth_token()? else {
            return Ok(None);
        };

        match self.directory.account_by_email(&token).filter(|a| a.verified).cloned() {
            Some(account) => {
                self.navigator.set_auth_state(true, Some(account.clone()));
                Ok(Some(account))
            }
            None => {
                self.directory.persistence().clear_auth_token()?;
                self.navigator.set_auth_state(false, None);
                Ok(None)
            }
        }
    }

    /// The signed-in account as currently stored
    pub fn profile(&self) -> Result<&Account> {
        let id = self.navigator.session().require_login()?.id;
        self.directory
            .accounts
            .get(id)
            .ok_or_else(|| Error::not_found("signed-in account no longer exists"))
    }

    /// Change the signed-in user's name
    pub fn update_profile(&mut self, first_name: &str, last_name: &str) -> Result<Account> {
        let mut account = self.profile()?.clone();
        let (first_name, last_name) = (first_name.trim(), last_name.trim());
        if first_name.is_empty() || last_name.is_empty() {
            return Err(Error::validation("first and last name are required"));
        }

        account.first_name = first_name.to_string();
        account.last_name = last_name.to_string();
        self.save_own_account(account)
    }

    /// Change the signed-in user's password
    pub fn change_password(&mut self, current: &str, new_password: &str) -> Result<()> {
        let mut account = self.profile()?.clone();
        if account.password != current {
            return Err(Error::authentication("current password is incorrect"));
        }
        validate_password(new_password, self.config.min_password_length)?;

        account.password = new_password.to_string();
        self.save_own_account(account)?;
        Ok(())
    }

    fn save_own_account(&mut self, account: Account) -> Result<Account> {
        let account = self.directory.accounts.update(account.id, account)?;
        self.navigator.set_auth_state(true, Some(account.clone()));
        self.navigator.refresh_current();
        Ok(account)
    }
}
