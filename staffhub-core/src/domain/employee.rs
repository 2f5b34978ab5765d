//! Employee domain model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::entity::{Entity, EntityKind};
use super::result::{Error, Result};

/// An employee record
///
/// `email` must name an existing account and `dept` an existing
/// department when the record is written. Neither reference is followed
/// on delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredEmployee")]
pub struct Employee {
    pub id: Uuid,
    /// Free-text staff number, not unique
    pub employee_id: String,
    pub email: String,
    pub position: String,
    pub dept: String,
    pub hire_date: NaiveDate,
}

/// Employee as found in storage
///
/// Older data kept the staff number in `id`. Such records get a fresh
/// UUID and the old value moves to `employeeId`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEmployee {
    #[serde(default)]
    id: Option<JsonValue>,
    #[serde(default)]
    employee_id: Option<String>,
    email: String,
    position: String,
    dept: String,
    hire_date: NaiveDate,
}

impl From<StoredEmployee> for Employee {
    fn from(stored: StoredEmployee) -> Self {
        let legacy_id = match stored.id {
            Some(JsonValue::String(s)) => Some(s),
            Some(JsonValue::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        let uuid = legacy_id
            .as_deref()
            .and_then(|id| Uuid::parse_str(id.trim()).ok());
        let employee_id = stored
            .employee_id
            .or_else(|| legacy_id.filter(|_| uuid.is_none()))
            .unwrap_or_default();

        Self {
            id: uuid.unwrap_or_else(Uuid::new_v4),
            employee_id,
            email: stored.email,
            position: stored.position,
            dept: stored.dept,
            hire_date: stored.hire_date,
        }
    }
}

impl Employee {
    pub fn new(
        employee_id: impl Into<String>,
        email: impl Into<String>,
        position: impl Into<String>,
        dept: impl Into<String>,
        hire_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            email: email.into(),
            position: position.into(),
            dept: dept.into(),
            hire_date,
        }
    }

    /// Field-level checks; cross-collection references are checked by the service
    pub fn validate(&self) -> Result<()> {
        if self.employee_id.trim().is_empty() {
            return Err(Error::validation("employee id is required"));
        }
        if self.email.trim().is_empty() {
            return Err(Error::validation("employee email is required"));
        }
        if self.position.trim().is_empty() {
            return Err(Error::validation("position is required"));
        }
        if self.dept.trim().is_empty() {
            return Err(Error::validation("department is required"));
        }
        Ok(())
    }

    /// Parse a hire date as entered in a form (YYYY-MM-DD)
    pub fn parse_hire_date(value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
            Error::validation(format!("invalid hire date '{}', use YYYY-MM-DD", value))
        })
    }
}

impl Entity for Employee {
    const KIND: EntityKind = EntityKind::Employee;

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
    fn test_hire_date_parsing() {
        let date = Employee::parse_hire_date("2024-03-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(Employee::parse_hire_date("03/01/2024").is_err());
    }

    #[test]
    fn test_hire_date_serializes_as_iso() {
        let employee = Employee::new(
            "E-1",
            "ada@example.com",
            "Engineer",
            "Engineering",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        let json = serde_json::to_value(&employee).unwrap();
        assert_eq!(json["hireDate"], "2024-03-01");
        assert_eq!(json["employeeId"], "E-1");
    }

    #[test]
    fn test_staff_number_in_id_field_is_kept() {
        let employee: Employee = serde_json::from_str(
            r#"{"id": "EMP001", "email": "admin@example.com", "position": "Dev",
                "dept": "Engineering", "hireDate": "2024-01-02"}"#,
        )
        .unwrap();
        assert_eq!(employee.employee_id, "EMP001");
        assert_eq!(employee.hire_date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        let numeric: Employee = serde_json::from_str(
            r#"{"id": 17, "email": "a@example.com", "position": "Dev",
                "dept": "HR", "hireDate": "2023-05-01"}"#,
        )
        .unwrap();
        assert_eq!(numeric.employee_id, "17");
    }

    #[test]
    fn test_stored_uuid_is_preserved() {
        let employee = Employee::new(
            "E-7",
            "ada@example.com",
            "Engineer",
            "Engineering",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        let json = serde_json::to_string(&employee).unwrap();
        let back: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(back, employee);
    }
}
