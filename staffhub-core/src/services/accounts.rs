//! Account administration service

use serde::Deserialize;
use uuid::Uuid;

use super::directory::Directory;
use super::navigation::NavigationController;
use crate::domain::result::{Error, Result};
use crate::domain::{validate_password, Account, Role};

/// Account form fields as entered by an administrator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Empty on update keeps the current password
    #[serde(default)]
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub verified: bool,
}

/// Admin-only account management
///
/// Holds the navigation controller rather than just the session so that
/// edits to the signed-in account are reflected in the session.
pub struct AccountService<'a> {
    directory: &'a mut Directory,
    navigator: &'a mut NavigationController,
    min_password_length: usize,
}

impl<'a> AccountService<'a> {
    pub fn new(
        directory: &'a mut Directory,
        navigator: &'a mut NavigationController,
        min_password_length: usize,
    ) -> Self {
        Self {
            directory,
            navigator,
            min_password_length,
        }
    }

    pub fn list(&self) -> Result<&[Account]> {
        self.navigator.session().require_admin()?;
        Ok(self.directory.accounts.all())
    }

    pub fn create(&mut self, input: AccountInput) -> Result<Account> {
        self.navigator.session().require_admin()?;

        let account = Account {
            id: Uuid::new_v4(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email.trim().to_string(),
            password: input.password,
            role: input.role,
            verified: input.verified,
        };
        account.validate(self.min_password_length)?;
        self.ensure_email_free(&account.email, None)?;

        self.directory.accounts.create(account)
    }

    pub fn update(&mut self, id: Uuid, input: AccountInput) -> Result<Account> {
        self.navigator.session().require_admin()?;
        let existing = self.existing(id)?;

        let password = if input.password.is_empty() {
            existing.password.clone()
        } else {
            input.password
        };
        let account = Account {
            id,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email.trim().to_string(),
            password,
            role: input.role,
            verified: input.verified,
        };
        account.validate(self.min_password_length)?;
        self.ensure_email_free(&account.email, Some(id))?;

        let account = self.directory.accounts.update(id, account)?;
        self.sync_session(&account)?;
        Ok(account)
    }

    /// Delete an account other than the signed-in one
    pub fn delete(&mut self, id: Uuid) -> Result<Account> {
        let current = self.navigator.session().require_admin()?;
        let target = self.existing(id)?;
        if target.id == current.id || target.has_email(&current.email) {
            return Err(Error::SelfDeletion);
        }

        self.directory.accounts.delete(id)
    }

    pub fn reset_password(&mut self, id: Uuid, new_password: &str) -> Result<Account> {
        self.navigator.session().require_admin()?;
        validate_password(new_password, self.min_password_length)?;

        let mut account = self.existing(id)?.clone();
        account.password = new_password.to_string();
        let account = self.directory.accounts.update(id, account)?;
        self.sync_session(&account)?;
        Ok(account)
    }

    fn existing(&self, id: Uuid) -> Result<&Account> {
        self.directory
            .accounts
            .get(id)
            .ok_or_else(|| Error::not_found(format!("no account with id {}", id)))
    }

    fn ensure_email_free(&self, email: &str, except: Option<Uuid>) -> Result<()> {
        let taken = self
            .directory
            .accounts
            .iter()
            .any(|a| a.has_email(email) && Some(a.id) != except);
        if taken {
            return Err(Error::validation(format!("{} is already registered", email)));
        }
        Ok(())
    }

    /// Keep the session and token in step when the signed-in account changes
    fn sync_session(&mut self, account: &Account) -> Result<()> {
        let is_current = self
            .navigator
            .session()
            .current_user()
            .is_some_and(|u| u.id == account.id);
        if is_current {
            self.directory.persistence().save_auth_token(&account.email)?;
            self.navigator.set_auth_state(true, Some(account.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::memory::InMemoryKeyValueStore;
    use crate::adapters::seed::SEED_ADMIN_EMAIL;
    use crate::adapters::views::RecordingViews;
    use crate::config::StorageLayout;
    use crate::domain::SessionState;
    use crate::ports::KeyValueStore;
    use crate::services::persistence::{Persistence, AUTH_TOKEN_KEY};

    struct Fixture {
        kv: Arc<InMemoryKeyValueStore>,
        directory: Directory,
        navigator: NavigationController,
    }

    impl Fixture {
        fn signed_in_as_seed_admin() -> Self {
            let kv = Arc::new(InMemoryKeyValueStore::new());
            let views = Arc::new(RecordingViews::new());
            let persistence = Arc::new(Persistence::new(kv.clone(), StorageLayout::PerEntity, "db"));
            let (directory, _) = Directory::load(persistence, views.clone()).unwrap();
            let mut navigator = NavigationController::new(views);
            let admin = directory.account_by_email(SEED_ADMIN_EMAIL).cloned();
            navigator.set_auth_state(true, admin);
            Self {
                kv,
                directory,
                navigator,
            }
        }

        fn service(&mut self) -> AccountService<'_> {
            AccountService::new(&mut self.directory, &mut self.navigator, 6)
        }

        fn admin_id(&self) -> Uuid {
            self.directory.account_by_email(SEED_ADMIN_EMAIL).unwrap().id
        }
    }

    fn input(email: &str, role: Role) -> AccountInput {
        AccountInput {
            first_name: "Linus".to_string(),
            last_name: "T".to_string(),
            email: email.to_string(),
            password: "kernel1".to_string(),
            role,
            verified: true,
        }
    }

    #[test]
    fn test_self_deletion_is_refused() {
        let mut fx = Fixture::signed_in_as_seed_admin();
        let admin_id = fx.admin_id();
        let before = fx.directory.accounts.all().to_vec();

        let result = fx.service().delete(admin_id);
        assert!(matches!(result, Err(Error::SelfDeletion)));
        assert_eq!(fx.directory.accounts.all(), before.as_slice());
    }

    #[test]
    fn test_delete_other_account() {
        let mut fx = Fixture::signed_in_as_seed_admin();
        let other = fx.service().create(input("linus@example.com", Role::User)).unwrap();
        assert_eq!(fx.directory.accounts.len(), 2);

        fx.service().delete(other.id).unwrap();
        assert_eq!(fx.directory.accounts.len(), 1);

        let stored: Vec<Account> =
            serde_json::from_str(&fx.kv.get("accounts").unwrap().unwrap()).unwrap();
        assert_eq!(stored, fx.directory.accounts.all());
    }

    #[test]
    fn test_create_rejects_duplicate_email() {
        let mut fx = Fixture::signed_in_as_seed_admin();
        let result = fx.service().create(input("Admin@Example.com", Role::User));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(fx.directory.accounts.len(), 1);
    }

    #[test]
    fn test_update_keeps_password_when_blank() {
        let mut fx = Fixture::signed_in_as_seed_admin();
        let other = fx.service().create(input("linus@example.com", Role::User)).unwrap();

        let mut edit = input("linus@kernel.org", Role::Admin);
        edit.password = String::new();
        let updated = fx.service().update(other.id, edit).unwrap();
        assert_eq!(updated.password, "kernel1");
        assert_eq!(updated.email, "linus@kernel.org");
        assert_eq!(fx.directory.accounts.position(other.id), Some(1));
    }

    #[test]
    fn test_editing_own_account_updates_session() {
        let mut fx = Fixture::signed_in_as_seed_admin();
        let admin_id = fx.admin_id();

        fx.service()
            .update(admin_id, input("root@example.com", Role::User))
            .unwrap();

        assert_eq!(fx.navigator.state(), SessionState::AuthenticatedUser);
        assert_eq!(fx.kv.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("root@example.com"));
        assert!(matches!(fx.service().list(), Err(Error::Authorization(_))));
    }

    #[test]
    fn test_reset_password_validates_length() {
        let mut fx = Fixture::signed_in_as_seed_admin();
        let other = fx.service().create(input("linus@example.com", Role::User)).unwrap();

        assert!(fx.service().reset_password(other.id, "abc").is_err());
        let account = fx.service().reset_password(other.id, "longer-secret").unwrap();
        assert_eq!(account.password, "longer-secret");
    }

    #[test]
    fn test_non_admin_is_refused() {
        let mut fx = Fixture::signed_in_as_seed_admin();
        let user = Account::new("U", "Ser", "user@example.com", "secret1", Role::User);
        fx.navigator.set_auth_state(true, Some(user));
        assert_eq!(fx.navigator.state(), SessionState::AuthenticatedUser);

        let result = fx.service().create(input("linus@example.com", Role::User));
        assert!(matches!(result, Err(Error::Authorization(_))));
        assert_eq!(fx.directory.accounts.len(), 1);
    }
}
