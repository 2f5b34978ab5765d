//! Self-service request domain model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{Entity, EntityKind};
use super::result::{Error, Result};

/// Request types offered on the "my requests" page
pub const REQUEST_TYPES: &[&str] = &["Equipment", "Leave", "Resources"];

/// Request status
///
/// Requests are created `Pending`. Nothing advances them yet; the other
/// values exist so stored data using them still loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}

/// One line of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestItem {
    pub name: String,
    pub qty: u32,
}

impl RequestItem {
    pub fn new(name: impl Into<String>, qty: u32) -> Self {
        Self {
            name: name.into(),
            qty,
        }
    }

    /// Parse `name:qty` (quantity defaults to 1 when omitted)
    pub fn parse(entry: &str) -> Result<Self> {
        let (name, qty) = match entry.rsplit_once(':') {
            Some((name, qty)) => {
                let qty = qty.trim().parse::<u32>().map_err(|_| {
                    Error::validation(format!("invalid quantity in item '{}'", entry))
                })?;
                (name, qty)
            }
            None => (entry, 1),
        };
        Ok(Self::new(name.trim(), qty))
    }
}

/// A request submitted by a signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Email of the account that submitted the request
    ///
    /// Absent on requests saved before owners were recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub items: Vec<RequestItem>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Request {
    pub fn new(owner: impl Into<String>, kind: impl Into<String>, items: Vec<RequestItem>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: Some(owner.into()),
            kind: kind.into(),
            items,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !REQUEST_TYPES.contains(&self.kind.as_str()) {
            return Err(Error::validation(format!(
                "unknown request type '{}' (expected one of {})",
                self.kind,
                REQUEST_TYPES.join(", ")
            )));
        }
        if self.items.is_empty() {
            return Err(Error::validation("a request needs at least one item"));
        }
        for item in &self.items {
            if item.name.trim().is_empty() {
                return Err(Error::validation("every item needs a name"));
            }
            if item.qty == 0 {
                return Err(Error::validation(format!(
                    "quantity for '{}' must be at least 1",
                    item.name
                )));
            }
        }
        Ok(())
    }

    /// Requests without an owner belong to whoever is signed in
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.owner
            .as_deref()
            .map_or(true, |owner| owner.eq_ignore_ascii_case(email.trim()))
    }
}

impl Entity for Request {
    const KIND: EntityKind = EntityKind::Request;

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_parsing() {
        assert_eq!(RequestItem::parse("Laptop:2").unwrap(), RequestItem::new("Laptop", 2));
        assert_eq!(RequestItem::parse("Mouse").unwrap(), RequestItem::new("Mouse", 1));
        assert!(RequestItem::parse("Chair:many").is_err());
    }

    #[test]
    fn test_request_validation() {
        let request = Request::new("ada@example.com", "Equipment", vec![]);
        assert!(matches!(request.validate(), Err(Error::Validation(_))));

        let request = Request::new("ada@example.com", "Snacks", vec![RequestItem::new("Chips", 1)]);
        assert!(request.validate().is_err());

        let request = Request::new("ada@example.com", "Equipment", vec![RequestItem::new("Laptop", 0)]);
        assert!(request.validate().is_err());

        let request = Request::new("ada@example.com", "Equipment", vec![RequestItem::new("Laptop", 1)]);
        assert!(request.validate().is_ok());
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn test_type_field_name() {
        let request = Request::new("ada@example.com", "Leave", vec![RequestItem::new("Day off", 1)]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "Leave");
        assert_eq!(json["status"], "Pending");
    }

    #[test]
    fn test_unowned_request_loads_as_pending() {
        let request: Request = serde_json::from_str(
            r#"{"type": "Equipment", "items": [{"name": "Laptop", "qty": 1}]}"#,
        )
        .unwrap();
        assert_eq!(request.owner, None);
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.is_owned_by("anyone@example.com"));

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("owner").is_none());
    }

    #[test]
    fn test_owner_match_ignores_case() {
        let request = Request::new("Ada@Example.com", "Leave", vec![RequestItem::new("Day off", 1)]);
        assert!(request.is_owned_by("ada@example.com"));
        assert!(!request.is_owned_by("bob@example.com"));
    }
}
