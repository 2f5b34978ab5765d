//! Departments command - admin department management

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use staffhub_core::{Command, EntityKind, LoggingService, Operation, Route};

use super::{confirm_delete, resolve_id, App};
use crate::output::success;

#[derive(Subcommand)]
pub enum DepartmentsCommands {
    /// List departments
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create a department
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        json: bool,
    },
    /// Edit a department; employees keep the old name
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete a department
    Delete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: DepartmentsCommands, logger: Option<&LoggingService>) -> Result<()> {
    let mut app = App::open(logger)?;

    match command {
        DepartmentsCommands::List { json } => {
            if json {
                let service = app.ctx.departments();
                println!("{}", serde_json::to_string_pretty(service.list()?)?);
                return Ok(());
            }
            app.show(Route::Departments)
        }
        DepartmentsCommands::Add { name, description, json } => {
            let outcome = app.dispatch(
                Command::new(EntityKind::Department, Operation::Create)
                    .with_payload(json!({ "name": name, "description": description })),
                json,
            )?;
            if !json {
                success(&format!("Created department {}", outcome.id));
            }
            Ok(())
        }
        DepartmentsCommands::Edit { id, name, description, json } => {
            let id = resolve_id(&app.ctx.directory.departments, &id)?;
            let current = app
                .ctx
                .directory
                .departments
                .get(id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Department {} not found", id))?;
            app.dispatch(
                Command::new(EntityKind::Department, Operation::Update)
                    .with_id(id)
                    .with_payload(json!({
                        "name": name.unwrap_or(current.name),
                        "description": description.unwrap_or(current.description),
                    })),
                json,
            )?;
            if !json {
                success("Department updated");
            }
            Ok(())
        }
        DepartmentsCommands::Delete { id, force, json } => {
            let id = resolve_id(&app.ctx.directory.departments, &id)?;
            let label = app
                .ctx
                .directory
                .departments
                .get(id)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| id.to_string());
            if !confirm_delete(&format!("department {}", label), force || json)? {
                println!("Cancelled.");
                return Ok(());
            }
            app.dispatch(
                Command::new(EntityKind::Department, Operation::Delete).with_id(id),
                json,
            )?;
            if !json {
                success(&format!("Deleted {}", label));
            }
            Ok(())
        }
    }
}
