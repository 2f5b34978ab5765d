//! Employee administration service

use serde::Deserialize;
use uuid::Uuid;

use super::directory::Directory;
use crate::domain::result::{Error, Result};
use crate::domain::{Employee, Session};

/// Employee form fields; the hire date is entered as YYYY-MM-DD
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub employee_id: String,
    pub email: String,
    pub position: String,
    pub dept: String,
    pub hire_date: String,
}

/// Admin-only employee management
pub struct EmployeeService<'a> {
    directory: &'a mut Directory,
    session: &'a Session,
}

impl<'a> EmployeeService<'a> {
    pub fn new(directory: &'a mut Directory, session: &'a Session) -> Self {
        Self { directory, session }
    }

    pub fn list(&self) -> Result<&[Employee]> {
        self.session.require_admin()?;
        Ok(self.directory.employees.all())
    }

    pub fn create(&mut self, input: EmployeeInput) -> Result<Employee> {
        self.session.require_admin()?;
        let employee = self.build(input)?;
        self.directory.employees.create(employee)
    }

    pub fn update(&mut self, id: Uuid, input: EmployeeInput) -> Result<Employee> {
        self.session.require_admin()?;
        let employee = self.build(input)?;
        self.directory.employees.update(id, employee)
    }

    pub fn delete(&mut self, id: Uuid) -> Result<Employee> {
        self.session.require_admin()?;
        self.directory.employees.delete(id)
    }

    /// Validate the form and resolve its references against the other collections
    fn build(&self, input: EmployeeInput) -> Result<Employee> {
        let hire_date = Employee::parse_hire_date(&input.hire_date)?;
        let mut employee = Employee::new(
            input.employee_id.trim(),
            input.email.trim(),
            input.position.trim(),
            input.dept.trim(),
            hire_date,
        );
        employee.validate()?;

        if self.directory.account_by_email(&employee.email).is_none() {
            return Err(Error::validation(format!(
                "no account is registered with {}",
                employee.email
            )));
        }
        let dept = self.directory.department_by_name(&employee.dept).ok_or_else(|| {
            Error::validation(format!("unknown department '{}'", employee.dept))
        })?;
        employee.dept = dept.name.clone();

        Ok(employee)
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
    use crate::ports::KeyValueStore;
    use crate::services::persistence::Persistence;
    use chrono::NaiveDate;

    fn setup() -> (Directory, Session, Arc<InMemoryKeyValueStore>) {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let persistence = Arc::new(Persistence::new(kv.clone(), StorageLayout::Consolidated, "db"));
        let (directory, _) = Directory::load(persistence, Arc::new(RecordingViews::new())).unwrap();
        let session =
            Session::for_user(directory.account_by_email(SEED_ADMIN_EMAIL).unwrap().clone());
        (directory, session, kv)
    }

    fn input(email: &str, dept: &str) -> EmployeeInput {
        EmployeeInput {
            employee_id: "E-100".to_string(),
            email: email.to_string(),
            position: "Developer".to_string(),
            dept: dept.to_string(),
            hire_date: "2023-09-04".to_string(),
        }
    }

    #[test]
    fn test_create_with_known_references() {
        let (mut dir, session, kv) = setup();
        let mut service = EmployeeService::new(&mut dir, &session);

        let employee = service.create(input(SEED_ADMIN_EMAIL, "engineering")).unwrap();
        assert_eq!(employee.dept, "Engineering");
        assert_eq!(employee.hire_date, NaiveDate::from_ymd_opt(2023, 9, 4).unwrap());

        let blob: serde_json::Value =
            serde_json::from_str(&kv.get("db").unwrap().unwrap()).unwrap();
        let stored: Vec<Employee> = serde_json::from_value(blob["employees"].clone()).unwrap();
        assert_eq!(stored, dir.employees.all());
    }

    #[test]
    fn test_unknown_email_is_rejected() {
        let (mut dir, session, _) = setup();
        let mut service = EmployeeService::new(&mut dir, &session);

        let result = service.create(input("ghost@example.com", "HR"));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_department_is_rejected() {
        let (mut dir, session, _) = setup();
        let mut service = EmployeeService::new(&mut dir, &session);

        let result = service.create(input(SEED_ADMIN_EMAIL, "Legal"));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_update_checks_references_again() {
        let (mut dir, session, _) = setup();
        let mut service = EmployeeService::new(&mut dir, &session);
        let employee = service.create(input(SEED_ADMIN_EMAIL, "HR")).unwrap();

        let result = service.update(employee.id, input(SEED_ADMIN_EMAIL, "Legal"));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(service.list().unwrap()[0].dept, "HR");

        let mut moved = input(SEED_ADMIN_EMAIL, "Engineering");
        moved.position = "Lead".to_string();
        let updated = service.update(employee.id, moved).unwrap();
        assert_eq!(updated.id, employee.id);
        assert_eq!(updated.position, "Lead");
    }

    #[test]
    fn test_bad_hire_date() {
        let (mut dir, session, _) = setup();
        let mut service = EmployeeService::new(&mut dir, &session);
        let mut bad = input(SEED_ADMIN_EMAIL, "HR");
        bad.hire_date = "04/09/2023".to_string();
        assert!(matches!(service.create(bad), Err(Error::Validation(_))));
    }
}
