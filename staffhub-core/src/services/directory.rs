//! Directory - the four entity stores loaded together

use std::sync::Arc;

use super::persistence::Persistence;
use super::store::{EntityStore, LoadReport};
use crate::adapters::seed::{
    generate_seed_accounts, generate_seed_departments, generate_seed_employees,
    generate_seed_requests,
};
use crate::domain::result::Result;
use crate::domain::{Account, Department, Employee, Entity, Request};
use crate::ports::ViewHooks;

/// All record collections of the application
pub struct Directory {
    pub accounts: EntityStore<Account>,
    pub departments: EntityStore<Department>,
    pub employees: EntityStore<Employee>,
    pub requests: EntityStore<Request>,
    persistence: Arc<Persistence>,
}

impl Directory {
    /// Load every collection, seeding the ones that are missing or corrupt
    pub fn load(
        persistence: Arc<Persistence>,
        views: Arc<dyn ViewHooks>,
    ) -> Result<(Self, Vec<LoadReport>)> {
        let (accounts, accounts_outcome) =
            EntityStore::load(Arc::clone(&persistence), Arc::clone(&views), generate_seed_accounts)?;
        let (departments, departments_outcome) = EntityStore::load(
            Arc::clone(&persistence),
            Arc::clone(&views),
            generate_seed_departments,
        )?;
        let (employees, employees_outcome) =
            EntityStore::load(Arc::clone(&persistence), Arc::clone(&views), generate_seed_employees)?;
        let (requests, requests_outcome) =
            EntityStore::load(Arc::clone(&persistence), views, generate_seed_requests)?;

        let reports = vec![
            LoadReport { kind: Account::KIND, outcome: accounts_outcome },
            LoadReport { kind: Department::KIND, outcome: departments_outcome },
            LoadReport { kind: Employee::KIND, outcome: employees_outcome },
            LoadReport { kind: Request::KIND, outcome: requests_outcome },
        ];

        Ok((
            Self {
                accounts,
                departments,
                employees,
                requests,
                persistence,
            },
            reports,
        ))
    }

    /// Re-read every collection from storage
    pub fn reload(&mut self) -> Result<Vec<LoadReport>> {
        Ok(vec![
            LoadReport { kind: Account::KIND, outcome: self.accounts.load_all()? },
            LoadReport { kind: Department::KIND, outcome: self.departments.load_all()? },
            LoadReport { kind: Employee::KIND, outcome: self.employees.load_all()? },
            LoadReport { kind: Request::KIND, outcome: self.requests.load_all()? },
        ])
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Account with `email`, compared case-insensitively
    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.find(|a| a.has_email(email))
    }

    /// Department with `name`, compared case-insensitively
    pub fn department_by_name(&self, name: &str) -> Option<&Department> {
        let name = name.trim();
        self.departments.find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Department names in stored order, for the employee form's dropdown
    pub fn department_options(&self) -> Vec<String> {
        self.departments.iter().map(|d| d.name.clone()).collect()
    }
}
