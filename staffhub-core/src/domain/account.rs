//! Account domain model

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{Entity, EntityKind};
use super::result::{Error, Result};

/// Access role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(Error::validation(format!("unknown role '{}'", other))),
        }
    }
}

/// A login account
///
/// Passwords are kept in plaintext. This is a simulation, not an
/// authentication system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub verified: bool,
}

impl Account {
    /// Create a new unverified account
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            role,
            verified: false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Case-insensitive email comparison
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Validate account data
    pub fn validate(&self, min_password_length: usize) -> Result<()> {
        if self.first_name.trim().is_empty() {
            return Err(Error::validation("first name is required"));
        }
        if self.last_name.trim().is_empty() {
            return Err(Error::validation("last name is required"));
        }
        validate_email(&self.email)?;
        validate_password(&self.password, min_password_length)
    }
}

impl Entity for Account {
    const KIND: EntityKind = EntityKind::Account;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Check that an email is present and syntactically plausible
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::validation("email is required"));
    }
    if !email_pattern().is_match(email) {
        return Err(Error::validation(format!("'{}' is not a valid email", email)));
    }
    Ok(())
}

/// Check a password against the configured minimum length
pub fn validate_password(password: &str, min_length: usize) -> Result<()> {
    if password.is_empty() {
        return Err(Error::validation("password is required"));
    }
    if password.chars().count() < min_length {
        return Err(Error::validation(format!(
            "password must be at least {} characters",
            min_length
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" User ".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_account_validation() {
        let mut account = Account::new("Ada", "Lovelace", "ada@example.com", "secret1", Role::User);
        assert!(account.validate(6).is_ok());

        account.email = "not-an-email".to_string();
        assert!(matches!(account.validate(6), Err(Error::Validation(_))));

        account.email = "ada@example.com".to_string();
        account.password = "abc".to_string();
        assert!(account.validate(6).is_err());

        account.password = "secret1".to_string();
        account.first_name = "  ".to_string();
        assert!(account.validate(6).is_err());
    }

    #[test]
    fn test_email_match_ignores_case() {
        let account = Account::new("Ada", "Lovelace", "Ada@Example.com", "secret1", Role::User);
        assert!(account.has_email("ada@example.com "));
        assert!(!account.has_email("bob@example.com"));
    }

    #[test]
    fn test_legacy_record_without_id_or_verified() {
        let json = r#"{"firstName":"Ada","lastName":"L","email":"a@b.co","password":"x","role":"user"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(!account.verified);
        assert_eq!(account.role, Role::User);
        assert!(!account.id.is_nil());
    }
}
