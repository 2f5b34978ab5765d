//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case and borrows the state it works on from
//! the context for the duration of one command.

pub mod accounts;
pub mod auth;
pub mod departments;
pub mod directory;
pub mod dispatch;
pub mod employees;
pub mod logging;
pub mod migration;
pub mod navigation;
pub mod persistence;
pub mod requests;
mod status;
pub mod store;

pub use accounts::{AccountInput, AccountService};
pub use auth::{AuthService, RegistrationInput};
pub use departments::{DepartmentInput, DepartmentService};
pub use directory::Directory;
pub use dispatch::{Command, CommandDispatcher, CommandOutcome, Handler, Operation};
pub use employees::{EmployeeInput, EmployeeService};
pub use logging::{EntryPoint, LogEntry, LogEvent, LogStats, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use navigation::{Denial, Navigation, NavigationController, ScheduledNavigation};
pub use persistence::{Persistence, RawCollection, AUTH_TOKEN_KEY, UNVERIFIED_EMAIL_KEY};
pub use requests::{RequestInput, RequestService};
pub use status::{StatusService, StatusSummary};
pub use store::{EntityStore, LoadOutcome, LoadReport, SeedReason};
