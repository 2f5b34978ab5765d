//! Staffhub Core - accounts, departments, employees and requests
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Records, routes and session state
//! - **ports**: Trait definitions for external collaborators (KeyValueStore, ViewHooks)
//! - **services**: Entity stores, auth, navigation and command dispatch
//! - **adapters**: Concrete implementations (DuckDB, in-memory, recording views)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod migrations;
pub mod log_migrations;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbKeyValueStore;
use config::Config;
use ports::{KeyValueStore, ViewHooks};
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    Account, Department, Employee, EntityKind, Request, RequestItem, Role, Route, Session,
    SessionState, View,
};
pub use domain::result::{Error, OperationResult};
pub use services::{Command, CommandOutcome, EntryPoint, LogEvent, LoggingService, Operation};

/// Store database file inside the data directory
pub const STORE_FILENAME: &str = "store.duckdb";

/// Main context for Staffhub operations
///
/// Owns the loaded collections, the session and the dispatch table.
/// Services are handed out per command and borrow from the context.
pub struct StaffhubContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub directory: Directory,
    pub navigator: NavigationController,
    pub dispatcher: CommandDispatcher,
    /// How each collection was obtained at startup
    pub load_reports: Vec<LoadReport>,
}

impl StaffhubContext {
    /// Open the store in `data_dir` and restore the previous session
    pub fn new(data_dir: &Path, views: Arc<dyn ViewHooks>) -> Result<Self> {
        let config = Config::load(data_dir)?;
        Self::open(data_dir, config, views)
    }

    /// Open the store in `data_dir` with an already resolved config
    pub fn open(data_dir: &Path, config: Config, views: Arc<dyn ViewHooks>) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let store = DuckDbKeyValueStore::new(&data_dir.join(STORE_FILENAME))?;
        store.ensure_schema()?;

        Self::with_store(config, Arc::new(store), views)
    }

    /// Build a context on an already opened store
    pub fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        views: Arc<dyn ViewHooks>,
    ) -> Result<Self> {
        let persistence = Arc::new(Persistence::new(
            Arc::clone(&store),
            config.storage_layout,
            config.blob_key.clone(),
        ));
        let (directory, load_reports) = Directory::load(persistence, Arc::clone(&views))
            .context("Failed to load collections")?;

        let mut context = Self {
            config,
            store,
            directory,
            navigator: NavigationController::new(views),
            dispatcher: CommandDispatcher::new(),
            load_reports,
        };
        context.auth().restore_session()?;

        Ok(context)
    }

    pub fn session(&self) -> &Session {
        self.navigator.session()
    }

    pub fn auth(&mut self) -> AuthService<'_> {
        AuthService::new(&mut self.directory, &mut self.navigator, &self.config)
    }

    pub fn accounts(&mut self) -> AccountService<'_> {
        AccountService::new(
            &mut self.directory,
            &mut self.navigator,
            self.config.min_password_length,
        )
    }

    pub fn departments(&mut self) -> DepartmentService<'_> {
        DepartmentService::new(&mut self.directory, self.navigator.session())
    }

    pub fn employees(&mut self) -> EmployeeService<'_> {
        EmployeeService::new(&mut self.directory, self.navigator.session())
    }

    pub fn requests(&mut self) -> RequestService<'_> {
        RequestService::new(&mut self.directory, self.navigator.session())
    }

    /// Run a mutation through the dispatch table
    pub fn dispatch(&mut self, command: &Command) -> domain::result::Result<CommandOutcome> {
        self.dispatcher
            .dispatch(&mut self.directory, &mut self.navigator, &self.config, command)
    }

    pub fn status(&self) -> StatusSummary {
        StatusService::new(&self.directory, self.navigator.session()).get_status()
    }

    /// Wipe every managed key, sign out and reseed all collections
    pub fn reset_storage(&mut self) -> Result<Vec<LoadReport>> {
        self.directory.persistence().reset()?;
        self.navigator.set_auth_state(false, None);
        let reports = self.directory.reload()?;
        self.load_reports = reports.clone();
        Ok(reports)
    }
}
