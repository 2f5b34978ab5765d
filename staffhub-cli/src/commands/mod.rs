//! CLI command implementations

pub mod accounts;
pub mod auth;
pub mod departments;
pub mod employees;
pub mod logs;
pub mod open;
pub mod profile;
mod render;
pub mod requests;
pub mod status;
pub mod storage;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dialoguer::{Confirm, Password};
use uuid::Uuid;

use staffhub_core::adapters::views::RecordingViews;
use staffhub_core::domain::Entity;
use staffhub_core::services::{EntityStore, Navigation};
use staffhub_core::{
    Command, CommandOutcome, EntryPoint, LogEvent, LoggingService, OperationResult, Route,
    StaffhubContext,
};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: Option<&LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Log a failure by its error kind, ignoring any errors
pub fn log_failure(logger: Option<&LoggingService>, event: LogEvent, error_kind: &str) {
    if let Some(l) = logger {
        let _ = l.log_error(event, error_kind);
    }
}

/// Core error kind anywhere in the chain, `internal` otherwise
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<staffhub_core::Error>())
        .map(|core| core.kind())
        .unwrap_or("internal")
}

/// A failure already written to stdout as a JSON result
#[derive(Debug)]
pub struct Reported(pub staffhub_core::Error);

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Reported {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STAFFHUB_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".staffhub")
    }
}

/// An opened context plus the renderer for the views it signals
pub struct App<'a> {
    pub ctx: StaffhubContext,
    views: Arc<RecordingViews>,
    logger: Option<&'a LoggingService>,
}

impl<'a> App<'a> {
    pub fn open(logger: Option<&'a LoggingService>) -> Result<Self> {
        let data_dir = get_data_dir();
        let views = Arc::new(RecordingViews::new());
        let ctx = StaffhubContext::new(&data_dir, views.clone())
            .context("Failed to initialize staffhub context")?;

        for report in ctx.load_reports.iter().filter(|r| r.outcome.was_seeded()) {
            log_event(
                logger,
                LogEvent::new("collection_seeded").with_entity(report.kind.to_string()),
            );
        }

        // Startup signals (session restore) are not shown
        views.drain();

        Ok(Self { ctx, views, logger })
    }

    pub fn log(&self, event: LogEvent) {
        log_event(self.logger, event);
    }

    /// Render every view signalled since the last call
    pub fn render(&mut self) -> Result<()> {
        let events = self.views.drain();
        render::render(&mut self.ctx, events)
    }

    /// Open a page and render it
    pub fn navigate(&mut self, route: Route) -> Result<Navigation> {
        let navigation = self.ctx.navigator.navigate_to(route);
        if let Some(l) = self.logger {
            let _ = l.log_page(navigation.page.page_id());
        }
        if let Some(denial) = navigation.denial {
            crate::output::warning(&render::denial_message(route, denial));
        }
        self.render()?;
        Ok(navigation)
    }

    /// Open a page that lists records; a redirect is a failure here
    pub fn show(&mut self, route: Route) -> Result<()> {
        self.navigate(route)?.into_result()?;
        Ok(())
    }

    /// Run a mutation through the dispatch table, then render what changed
    pub fn dispatch(&mut self, command: Command, json: bool) -> Result<CommandOutcome> {
        let result = self.ctx.dispatch(&command);

        let event = LogEvent::new(format!("record_{}", command.op))
            .with_entity(command.kind.to_string());
        match &result {
            Ok(_) => self.log(event),
            Err(e) => log_failure(self.logger, event, e.kind()),
        }

        if json {
            let context = HashMap::from([
                ("entity".to_string(), serde_json::json!(command.kind)),
                ("op".to_string(), serde_json::json!(command.op)),
            ]);
            let output = match &result {
                Ok(outcome) => OperationResult::ok_with_context(outcome.clone(), context),
                Err(e) => OperationResult {
                    error_kind: Some(e.kind().to_string()),
                    ..OperationResult::fail(e.to_string())
                },
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            self.views.drain();
            return result.map_err(|e| anyhow::Error::new(Reported(e)));
        }

        if result.is_ok() {
            self.render()?;
        }
        Ok(result?)
    }
}

/// Resolve a full id or an unambiguous id prefix within a collection
pub fn resolve_id<T: Entity>(store: &EntityStore<T>, input: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input.trim()) {
        return Ok(id);
    }

    let prefix = input.trim().to_lowercase();
    if prefix.is_empty() {
        bail!("No {} id given", store.kind());
    }
    let matches: Vec<Uuid> = store
        .iter()
        .map(|r| r.id())
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("No {} record matches id '{}'", store.kind(), input),
        _ => bail!("Id '{}' matches {} {} records", input, matches.len(), store.kind()),
    }
}

/// Take a password from the flag or prompt for it
pub fn password_or_prompt(password: Option<String>, prompt: &str, confirm: bool) -> Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }
    let mut input = Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(input.interact()?)
}

/// Ask before deleting unless --force was given
pub fn confirm_delete(what: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    Ok(Confirm::new()
        .with_prompt(format!("Delete {}?", what))
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffhub_core::adapters::memory::InMemoryKeyValueStore;
    use staffhub_core::config::Config;
    use staffhub_core::{EntityKind, Operation};

    fn app() -> App<'static> {
        let views = Arc::new(RecordingViews::new());
        let ctx = StaffhubContext::with_store(
            Config::default(),
            Arc::new(InMemoryKeyValueStore::new()),
            views.clone(),
        )
        .unwrap();
        App {
            ctx,
            views,
            logger: None,
        }
    }

    fn add_department() -> Command {
        Command::new(EntityKind::Department, Operation::Create)
            .with_payload(serde_json::json!({ "name": "Ops", "description": "" }))
    }

    #[test]
    fn test_json_failure_is_marked_as_reported() {
        let mut app = app();
        let err = app.dispatch(add_department(), true).unwrap_err();
        assert!(err.is::<Reported>());
        assert_eq!(error_kind(&err), "authorization");
    }

    #[test]
    fn test_plain_failure_is_left_for_main() {
        let mut app = app();
        let err = app.dispatch(add_department(), false).unwrap_err();
        assert!(!err.is::<Reported>());
        assert_eq!(error_kind(&err), "authorization");
    }

    #[test]
    fn test_error_kind_looks_through_context() {
        let err = anyhow::Error::new(staffhub_core::Error::SelfDeletion).context("deleting account");
        assert_eq!(error_kind(&err), "self_deletion");
        assert_eq!(error_kind(&anyhow::anyhow!("disk full")), "internal");
    }
}
