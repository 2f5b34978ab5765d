//! Entity kinds and the trait shared by every stored record

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};

/// The four record collections managed by the entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Account,
    Department,
    Employee,
    Request,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Account,
        EntityKind::Department,
        EntityKind::Employee,
        EntityKind::Request,
    ];

    /// Field name inside the consolidated blob
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Account => "accounts",
            EntityKind::Department => "departments",
            EntityKind::Employee => "employees",
            EntityKind::Request => "requests",
        }
    }

    /// Storage key when every collection has its own key
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::Account => "accounts",
            EntityKind::Department => "departments",
            EntityKind::Employee => "employees",
            EntityKind::Request => "myRequests",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "account" | "accounts" => Ok(EntityKind::Account),
            "department" | "departments" => Ok(EntityKind::Department),
            "employee" | "employees" => Ok(EntityKind::Employee),
            "request" | "requests" | "my-requests" | "myrequests" => Ok(EntityKind::Request),
            other => Err(Error::validation(format!("unknown entity kind '{}'", other))),
        }
    }
}

/// A record that lives in an entity store
///
/// Records are addressed by a stable id; positions exist only inside
/// the store.
pub trait Entity: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Uuid;

    fn set_id(&mut self, id: Uuid);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_use_legacy_key() {
        assert_eq!(EntityKind::Request.storage_key(), "myRequests");
        assert_eq!(EntityKind::Request.collection(), "requests");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Employees".parse::<EntityKind>().unwrap(), EntityKind::Employee);
        assert_eq!("my-requests".parse::<EntityKind>().unwrap(), EntityKind::Request);
        assert!("payroll".parse::<EntityKind>().is_err());
    }
}
