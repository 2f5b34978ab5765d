//! Core domain entities
//!
//! Records, routes and session state. These are plain data structures
//! with validation logic - no I/O.

mod account;
mod department;
mod employee;
pub mod entity;
mod request;
pub mod result;
pub mod route;
mod session;

pub use account::{validate_email, validate_password, Account, Role};
pub use department::Department;
pub use employee::Employee;
pub use entity::{Entity, EntityKind};
pub use request::{Request, RequestItem, RequestStatus, REQUEST_TYPES};
pub use route::{Access, Route, View};
pub use session::{NavAffordances, Session, SessionState};
