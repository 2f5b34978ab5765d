//! Department administration service

use serde::Deserialize;
use uuid::Uuid;

use super::directory::Directory;
use crate::domain::result::Result;
use crate::domain::{Department, Session};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl DepartmentInput {
    fn into_department(self) -> Department {
        Department::new(self.name.trim(), self.description.trim())
    }
}

/// Admin-only department management
///
/// Employees refer to departments by name; renaming or deleting a
/// department leaves existing employee records untouched.
pub struct DepartmentService<'a> {
    directory: &'a mut Directory,
    session: &'a Session,
}

impl<'a> DepartmentService<'a> {
    pub fn new(directory: &'a mut Directory, session: &'a Session) -> Self {
        Self { directory, session }
    }

    pub fn list(&self) -> Result<&[Department]> {
        self.session.require_admin()?;
        Ok(self.directory.departments.all())
    }

    pub fn create(&mut self, input: DepartmentInput) -> Result<Department> {
        self.session.require_admin()?;
        let department = input.into_department();
        department.validate()?;
        self.directory.departments.create(department)
    }

    pub fn update(&mut self, id: Uuid, input: DepartmentInput) -> Result<Department> {
        self.session.require_admin()?;
        let department = input.into_department();
        department.validate()?;
        self.directory.departments.update(id, department)
    }

    pub fn delete(&mut self, id: Uuid) -> Result<Department> {
        self.session.require_admin()?;
        self.directory.departments.delete(id)
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
    use crate::domain::result::Error;
    use crate::domain::{Account, Employee, Role};
    use crate::services::persistence::Persistence;
    use chrono::NaiveDate;

    fn directory() -> Directory {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let persistence = Arc::new(Persistence::new(kv, StorageLayout::Consolidated, "db"));
        Directory::load(persistence, Arc::new(RecordingViews::new())).unwrap().0
    }

    fn admin_session(directory: &Directory) -> Session {
        Session::for_user(directory.account_by_email(SEED_ADMIN_EMAIL).unwrap().clone())
    }

    fn input(name: &str) -> DepartmentInput {
        DepartmentInput {
            name: name.to_string(),
            description: " Operations ".to_string(),
        }
    }

    #[test]
    fn test_crud_as_admin() {
        let mut dir = directory();
        let session = admin_session(&dir);
        let mut service = DepartmentService::new(&mut dir, &session);

        let ops = service.create(input("Ops")).unwrap();
        assert_eq!(ops.description, "Operations");
        assert_eq!(service.list().unwrap().len(), 3);

        let renamed = service.update(ops.id, input("Platform")).unwrap();
        assert_eq!(renamed.id, ops.id);
        assert_eq!(service.list().unwrap()[2].name, "Platform");

        service.delete(ops.id).unwrap();
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut dir = directory();
        let session = admin_session(&dir);
        let mut service = DepartmentService::new(&mut dir, &session);

        assert!(matches!(service.create(input("  ")), Err(Error::Validation(_))));
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_does_not_cascade() {
        let mut dir = directory();
        let session = admin_session(&dir);
        let hr = dir.department_by_name("hr").unwrap().id;
        let hire_date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        dir.employees
            .create(Employee::new("E-1", SEED_ADMIN_EMAIL, "Recruiter", "HR", hire_date))
            .unwrap();

        DepartmentService::new(&mut dir, &session).delete(hr).unwrap();
        assert_eq!(dir.employees.len(), 1);
        assert_eq!(dir.employees.all()[0].dept, "HR");
    }

    #[test]
    fn test_requires_admin() {
        let mut dir = directory();
        let user = Session::for_user(Account::new("U", "Ser", "u@example.com", "secret1", Role::User));
        let mut service = DepartmentService::new(&mut dir, &user);
        assert!(matches!(service.list(), Err(Error::Authorization(_))));
        assert!(matches!(service.create(input("Ops")), Err(Error::Authorization(_))));

        let anonymous = Session::anonymous();
        let service = DepartmentService::new(&mut dir, &anonymous);
        assert!(matches!(service.list(), Err(Error::Authorization(_))));
    }
}
