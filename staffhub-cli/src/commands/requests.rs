//! Requests command - the signed-in user's own requests

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use staffhub_core::domain::REQUEST_TYPES;
use staffhub_core::{Command, EntityKind, LoggingService, Operation, RequestItem, Route};

use super::{confirm_delete, resolve_id, App};
use crate::output::success;

#[derive(Subcommand)]
pub enum RequestsCommands {
    /// List your requests
    List {
        #[arg(long)]
        json: bool,
    },
    /// Submit a request
    Add {
        /// Equipment, Leave or Resources
        #[arg(long = "type")]
        kind: String,
        /// Item as name:qty (repeatable; qty defaults to 1)
        #[arg(long = "item", required = true)]
        items: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete one of your requests
    Delete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show the request types
    Types,
}

pub fn run(command: RequestsCommands, logger: Option<&LoggingService>) -> Result<()> {
    if let RequestsCommands::Types = command {
        for kind in REQUEST_TYPES {
            println!("{}", kind);
        }
        return Ok(());
    }

    let mut app = App::open(logger)?;

    match command {
        RequestsCommands::List { json } => {
            if json {
                let service = app.ctx.requests();
                println!("{}", serde_json::to_string_pretty(&service.list_mine()?)?);
                return Ok(());
            }
            app.show(Route::MyRequests)
        }
        RequestsCommands::Add { kind, items, json } => {
            let items = items
                .iter()
                .map(|entry| RequestItem::parse(entry))
                .collect::<Result<Vec<_>, _>>()?;
            let outcome = app.dispatch(
                Command::new(EntityKind::Request, Operation::Create)
                    .with_payload(json!({ "type": kind, "items": items })),
                json,
            )?;
            if !json {
                success(&format!("Submitted request {}", outcome.id));
            }
            Ok(())
        }
        RequestsCommands::Delete { id, force, json } => {
            let id = resolve_id(&app.ctx.directory.requests, &id)?;
            if !confirm_delete(&format!("request {}", id), force || json)? {
                println!("Cancelled.");
                return Ok(());
            }
            app.dispatch(Command::new(EntityKind::Request, Operation::Delete).with_id(id), json)?;
            if !json {
                success("Request deleted");
            }
            Ok(())
        }
        RequestsCommands::Types => Ok(()),
    }
}
