//! Status service - collection counts and session state for the home page

use serde::Serialize;

use super::directory::Directory;
use crate::config::StorageLayout;
use crate::domain::{RequestStatus, Role, Session, SessionState};

pub struct StatusService<'a> {
    directory: &'a Directory,
    session: &'a Session,
}

impl<'a> StatusService<'a> {
    pub fn new(directory: &'a Directory, session: &'a Session) -> Self {
        Self { directory, session }
    }

    pub fn get_status(&self) -> StatusSummary {
        let accounts = self.directory.accounts.all();
        let requests = self.directory.requests.all();

        StatusSummary {
            session: self.session.state(),
            signed_in_as: self.session.current_user().map(|u| u.first_name.clone()),
            storage_layout: self.directory.persistence().layout(),
            total_accounts: accounts.len(),
            admin_accounts: accounts.iter().filter(|a| a.role == Role::Admin).count(),
            unverified_accounts: accounts.iter().filter(|a| !a.verified).count(),
            total_departments: self.directory.departments.len(),
            total_employees: self.directory.employees.len(),
            total_requests: requests.len(),
            pending_requests: requests
                .iter()
                .filter(|r| r.status == RequestStatus::Pending)
                .count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub session: SessionState,
    /// First name only
    pub signed_in_as: Option<String>,
    pub storage_layout: StorageLayout,
    pub total_accounts: usize,
    pub admin_accounts: usize,
    pub unverified_accounts: usize,
    pub total_departments: usize,
    pub total_employees: usize,
    pub total_requests: usize,
    pub pending_requests: usize,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::memory::InMemoryKeyValueStore;
    use crate::adapters::views::RecordingViews;
    use crate::domain::{Account, Request, RequestItem};
    use crate::services::persistence::Persistence;

    #[test]
    fn test_counts_on_fresh_store() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let persistence = Arc::new(Persistence::new(kv, StorageLayout::Consolidated, "db"));
        let (mut dir, _) = Directory::load(persistence, Arc::new(RecordingViews::new())).unwrap();

        dir.accounts
            .create(Account::new("New", "Hire", "new@example.com", "secret1", Role::User))
            .unwrap();
        dir.requests
            .create(Request::new("new@example.com", "Leave", vec![RequestItem::new("Day off", 1)]))
            .unwrap();

        let session = Session::anonymous();
        let summary = StatusService::new(&dir, &session).get_status();
        assert_eq!(summary.session, SessionState::Anonymous);
        assert!(summary.signed_in_as.is_none());
        assert_eq!(summary.total_accounts, 2);
        assert_eq!(summary.admin_accounts, 1);
        assert_eq!(summary.unverified_accounts, 1);
        assert_eq!(summary.total_departments, 2);
        assert_eq!(summary.total_employees, 0);
        assert_eq!(summary.pending_requests, 1);
    }
}
