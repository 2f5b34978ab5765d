//! Command dispatch - routes (entity kind, operation) pairs to handlers

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::accounts::{AccountInput, AccountService};
use super::departments::{DepartmentInput, DepartmentService};
use super::directory::Directory;
use super::employees::{EmployeeInput, EmployeeService};
use super::navigation::NavigationController;
use super::requests::{RequestInput, RequestService};
use crate::config::Config;
use crate::domain::result::{Error, Result};
use crate::domain::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Delete,
    ResetPassword,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::ResetPassword => "reset_password",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "create" | "add" => Ok(Operation::Create),
            "update" | "edit" => Ok(Operation::Update),
            "delete" | "remove" => Ok(Operation::Delete),
            "reset_password" => Ok(Operation::ResetPassword),
            other => Err(Error::validation(format!("unknown operation '{}'", other))),
        }
    }
}

/// A mutation requested by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub kind: EntityKind,
    pub op: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub payload: JsonValue,
}

impl Command {
    pub fn new(kind: EntityKind, op: Operation) -> Self {
        Self {
            kind,
            op,
            id: None,
            payload: JsonValue::Null,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload = payload;
        self
    }

    fn target(&self) -> Result<Uuid> {
        self.id
            .ok_or_else(|| Error::validation(format!("{} {} needs a record id", self.kind, self.op)))
    }

    fn input<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone()).map_err(|e| {
            Error::validation(format!("invalid {} {} payload: {}", self.kind, self.op, e))
        })
    }
}

/// Result of a dispatched command
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub kind: EntityKind,
    pub op: Operation,
    pub id: Uuid,
    /// The record as stored after the operation (or as removed, for deletes)
    pub record: Option<JsonValue>,
}

impl CommandOutcome {
    fn new<T: Serialize>(command: &Command, id: Uuid, record: &T) -> Result<Self> {
        Ok(Self {
            kind: command.kind,
            op: command.op,
            id,
            record: Some(serde_json::to_value(record)?),
        })
    }
}

pub type Handler =
    fn(&mut Directory, &mut NavigationController, &Config, &Command) -> Result<CommandOutcome>;

/// Dispatch table keyed by (entity kind, operation)
pub struct CommandDispatcher {
    handlers: HashMap<(EntityKind, Operation), Handler>,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDispatcher {
    /// Table with every built-in handler registered
    pub fn new() -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.register(EntityKind::Account, Operation::Create, create_account);
        dispatcher.register(EntityKind::Account, Operation::Update, update_account);
        dispatcher.register(EntityKind::Account, Operation::Delete, delete_account);
        dispatcher.register(EntityKind::Account, Operation::ResetPassword, reset_password);
        dispatcher.register(EntityKind::Department, Operation::Create, create_department);
        dispatcher.register(EntityKind::Department, Operation::Update, update_department);
        dispatcher.register(EntityKind::Department, Operation::Delete, delete_department);
        dispatcher.register(EntityKind::Employee, Operation::Create, create_employee);
        dispatcher.register(EntityKind::Employee, Operation::Update, update_employee);
        dispatcher.register(EntityKind::Employee, Operation::Delete, delete_employee);
        dispatcher.register(EntityKind::Request, Operation::Create, create_request);
        dispatcher.register(EntityKind::Request, Operation::Delete, delete_request);
        dispatcher
    }

    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register or replace the handler for a pair
    pub fn register(&mut self, kind: EntityKind, op: Operation, handler: Handler) {
        self.handlers.insert((kind, op), handler);
    }

    pub fn supports(&self, kind: EntityKind, op: Operation) -> bool {
        self.handlers.contains_key(&(kind, op))
    }

    /// Operations registered for `kind`, in declaration order
    pub fn operations(&self, kind: EntityKind) -> Vec<Operation> {
        [
            Operation::Create,
            Operation::Update,
            Operation::Delete,
            Operation::ResetPassword,
        ]
        .into_iter()
        .filter(|op| self.supports(kind, *op))
        .collect()
    }

    pub fn dispatch(
        &self,
        directory: &mut Directory,
        navigator: &mut NavigationController,
        config: &Config,
        command: &Command,
    ) -> Result<CommandOutcome> {
        let handler = self.handlers.get(&(command.kind, command.op)).ok_or_else(|| {
            Error::validation(format!("{} does not support {}", command.kind, command.op))
        })?;
        handler(directory, navigator, config, command)
    }
}

#[derive(Deserialize)]
struct PasswordInput {
    password: String,
}

fn create_account(
    dir: &mut Directory,
    nav: &mut NavigationController,
    config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let account = AccountService::new(dir, nav, config.min_password_length).create(cmd.input()?)?;
    CommandOutcome::new(cmd, account.id, &account)
}

fn update_account(
    dir: &mut Directory,
    nav: &mut NavigationController,
    config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let id = cmd.target()?;
    let input: AccountInput = cmd.input()?;
    let account = AccountService::new(dir, nav, config.min_password_length).update(id, input)?;
    CommandOutcome::new(cmd, id, &account)
}

fn delete_account(
    dir: &mut Directory,
    nav: &mut NavigationController,
    config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let id = cmd.target()?;
    let account = AccountService::new(dir, nav, config.min_password_length).delete(id)?;
    CommandOutcome::new(cmd, id, &account)
}

fn reset_password(
    dir: &mut Directory,
    nav: &mut NavigationController,
    config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let id = cmd.target()?;
    let input: PasswordInput = cmd.input()?;
    let account = AccountService::new(dir, nav, config.min_password_length)
        .reset_password(id, &input.password)?;
    CommandOutcome::new(cmd, id, &account)
}

fn create_department(
    dir: &mut Directory,
    nav: &mut NavigationController,
    _config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let input: DepartmentInput = cmd.input()?;
    let department = DepartmentService::new(dir, nav.session()).create(input)?;
    CommandOutcome::new(cmd, department.id, &department)
}

fn update_department(
    dir: &mut Directory,
    nav: &mut NavigationController,
    _config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let id = cmd.target()?;
    let input: DepartmentInput = cmd.input()?;
    let department = DepartmentService::new(dir, nav.session()).update(id, input)?;
    CommandOutcome::new(cmd, id, &department)
}

fn delete_department(
    dir: &mut Directory,
    nav: &mut NavigationController,
    _config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let id = cmd.target()?;
    let department = DepartmentService::new(dir, nav.session()).delete(id)?;
    CommandOutcome::new(cmd, id, &department)
}

fn create_employee(
    dir: &mut Directory,
    nav: &mut NavigationController,
    _config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let input: EmployeeInput = cmd.input()?;
    let employee = EmployeeService::new(dir, nav.session()).create(input)?;
    CommandOutcome::new(cmd, employee.id, &employee)
}

fn update_employee(
    dir: &mut Directory,
    nav: &mut NavigationController,
    _config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let id = cmd.target()?;
    let input: EmployeeInput = cmd.input()?;
    let employee = EmployeeService::new(dir, nav.session()).update(id, input)?;
    CommandOutcome::new(cmd, id, &employee)
}

fn delete_employee(
    dir: &mut Directory,
    nav: &mut NavigationController,
    _config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let id = cmd.target()?;
    let employee = EmployeeService::new(dir, nav.session()).delete(id)?;
    CommandOutcome::new(cmd, id, &employee)
}

fn create_request(
    dir: &mut Directory,
    nav: &mut NavigationController,
    _config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let input: RequestInput = cmd.input()?;
    let request = RequestService::new(dir, nav.session()).create(input)?;
    CommandOutcome::new(cmd, request.id, &request)
}

fn delete_request(
    dir: &mut Directory,
    nav: &mut NavigationController,
    _config: &Config,
    cmd: &Command,
) -> Result<CommandOutcome> {
    let id = cmd.target()?;
    let request = RequestService::new(dir, nav.session()).delete(id)?;
    CommandOutcome::new(cmd, id, &request)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::adapters::memory::InMemoryKeyValueStore;
    use crate::adapters::seed::SEED_ADMIN_EMAIL;
    use crate::adapters::views::RecordingViews;
    use crate::config::StorageLayout;
    use crate::services::persistence::Persistence;

    fn setup() -> (Directory, NavigationController, Config) {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let views = Arc::new(RecordingViews::new());
        let persistence = Arc::new(Persistence::new(kv, StorageLayout::Consolidated, "db"));
        let (directory, _) = Directory::load(persistence, views.clone()).unwrap();
        let mut navigator = NavigationController::new(views);
        navigator.set_auth_state(true, directory.account_by_email(SEED_ADMIN_EMAIL).cloned());
        (directory, navigator, Config::default())
    }

    #[test]
    fn test_dispatch_department_lifecycle() {
        let (mut dir, mut nav, config) = setup();
        let dispatcher = CommandDispatcher::new();

        let created = dispatcher
            .dispatch(
                &mut dir,
                &mut nav,
                &config,
                &Command::new(EntityKind::Department, Operation::Create)
                    .with_payload(json!({"name": "Ops", "description": "Operations"})),
            )
            .unwrap();
        assert_eq!(created.record.as_ref().unwrap()["name"], "Ops");
        assert!(dir.departments.get(created.id).is_some());

        dispatcher
            .dispatch(
                &mut dir,
                &mut nav,
                &config,
                &Command::new(EntityKind::Department, Operation::Delete).with_id(created.id),
            )
            .unwrap();
        assert!(dir.departments.get(created.id).is_none());
    }

    #[test]
    fn test_missing_id_is_validation_error() {
        let (mut dir, mut nav, config) = setup();
        let result = CommandDispatcher::new().dispatch(
            &mut dir,
            &mut nav,
            &config,
            &Command::new(EntityKind::Employee, Operation::Delete),
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_unsupported_pair_is_validation_error() {
        let (mut dir, mut nav, config) = setup();
        let dispatcher = CommandDispatcher::new();
        assert!(!dispatcher.supports(EntityKind::Request, Operation::Update));
        assert_eq!(
            dispatcher.operations(EntityKind::Request),
            vec![Operation::Create, Operation::Delete]
        );

        let result = dispatcher.dispatch(
            &mut dir,
            &mut nav,
            &config,
            &Command::new(EntityKind::Department, Operation::ResetPassword).with_id(Uuid::new_v4()),
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_bad_payload_is_validation_error() {
        let (mut dir, mut nav, config) = setup();
        let result = CommandDispatcher::new().dispatch(
            &mut dir,
            &mut nav,
            &config,
            &Command::new(EntityKind::Request, Operation::Create).with_payload(json!({"items": 3})),
        );
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(dir.requests.is_empty());
    }

    #[test]
    fn test_reset_password_through_dispatch() {
        let (mut dir, mut nav, config) = setup();
        let admin_id = dir.account_by_email(SEED_ADMIN_EMAIL).unwrap().id;

        CommandDispatcher::new()
            .dispatch(
                &mut dir,
                &mut nav,
                &config,
                &Command::new(EntityKind::Account, Operation::ResetPassword)
                    .with_id(admin_id)
                    .with_payload(json!({"password": "n3w-secret"})),
            )
            .unwrap();
        assert_eq!(dir.accounts.get(admin_id).unwrap().password, "n3w-secret");
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!("reset-password".parse::<Operation>().unwrap(), Operation::ResetPassword);
        assert_eq!("Add".parse::<Operation>().unwrap(), Operation::Create);
        assert!("approve".parse::<Operation>().is_err());
    }
}
