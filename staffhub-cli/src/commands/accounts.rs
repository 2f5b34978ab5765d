//! Accounts command - admin account management

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use staffhub_core::{Command, EntityKind, LoggingService, Operation, Role, Route};

use super::{confirm_delete, password_or_prompt, resolve_id, App};
use crate::output::success;

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// List all accounts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an account
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,
        #[arg(long, default_value = "user")]
        role: Role,
        /// Create the account already verified
        #[arg(long)]
        verified: bool,
        #[arg(long)]
        json: bool,
    },
    /// Edit an account; omitted fields keep their value
    Edit {
        /// Account id or id prefix
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        verified: Option<bool>,
        #[arg(long)]
        json: bool,
    },
    /// Delete an account (not your own)
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Set a new password for an account
    ResetPassword {
        id: String,
        /// New password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: AccountsCommands, logger: Option<&LoggingService>) -> Result<()> {
    let mut app = App::open(logger)?;

    match command {
        AccountsCommands::List { json } => {
            if json {
                let service = app.ctx.accounts();
                println!("{}", serde_json::to_string_pretty(service.list()?)?);
                return Ok(());
            }
            app.show(Route::Accounts)
        }
        AccountsCommands::Add { first_name, last_name, email, password, role, verified, json } => {
            app.ctx.session().require_admin()?;
            let password = password_or_prompt(password, "Password", true)?;
            let payload = json!({
                "firstName": first_name,
                "lastName": last_name,
                "email": email,
                "password": password,
                "role": role,
                "verified": verified,
            });
            let outcome = app.dispatch(
                Command::new(EntityKind::Account, Operation::Create).with_payload(payload),
                json,
            )?;
            if !json {
                success(&format!("Created account {}", outcome.id));
            }
            Ok(())
        }
        AccountsCommands::Edit { id, first_name, last_name, email, password, role, verified, json } => {
            let id = resolve_id(&app.ctx.directory.accounts, &id)?;
            let current = app
                .ctx
                .directory
                .accounts
                .get(id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Account {} not found", id))?;
            let payload = json!({
                "firstName": first_name.unwrap_or(current.first_name),
                "lastName": last_name.unwrap_or(current.last_name),
                "email": email.unwrap_or(current.email),
                "password": password.unwrap_or_default(),
                "role": role.unwrap_or(current.role),
                "verified": verified.unwrap_or(current.verified),
            });
            app.dispatch(
                Command::new(EntityKind::Account, Operation::Update)
                    .with_id(id)
                    .with_payload(payload),
                json,
            )?;
            if !json {
                success("Account updated");
            }
            Ok(())
        }
        AccountsCommands::Delete { id, force, json } => {
            let id = resolve_id(&app.ctx.directory.accounts, &id)?;
            let label = app
                .ctx
                .directory
                .accounts
                .get(id)
                .map(|a| a.email.clone())
                .unwrap_or_else(|| id.to_string());
            if !confirm_delete(&format!("account {}", label), force || json)? {
                println!("Cancelled.");
                return Ok(());
            }
            app.dispatch(Command::new(EntityKind::Account, Operation::Delete).with_id(id), json)?;
            if !json {
                success(&format!("Deleted {}", label));
            }
            Ok(())
        }
        AccountsCommands::ResetPassword { id, password, json } => {
            app.ctx.session().require_admin()?;
            let id = resolve_id(&app.ctx.directory.accounts, &id)?;
            let password = password_or_prompt(password, "New password", true)?;
            app.dispatch(
                Command::new(EntityKind::Account, Operation::ResetPassword)
                    .with_id(id)
                    .with_payload(json!({ "password": password })),
                json,
            )?;
            if !json {
                success("Password reset");
            }
            Ok(())
        }
    }
}
