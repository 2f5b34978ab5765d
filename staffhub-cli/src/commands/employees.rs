//! Employees command - admin employee management

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use staffhub_core::{Command, EntityKind, LoggingService, Operation, Route};

use super::{confirm_delete, resolve_id, App};
use crate::output::success;

#[derive(Subcommand)]
pub enum EmployeesCommands {
    /// List employees
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create an employee record for an existing account
    Add {
        #[arg(long)]
        employee_id: String,
        /// Email of an existing account
        #[arg(long)]
        email: String,
        #[arg(long)]
        position: String,
        /// Name of an existing department
        #[arg(long)]
        dept: String,
        /// YYYY-MM-DD
        #[arg(long)]
        hire_date: String,
        #[arg(long)]
        json: bool,
    },
    /// Edit an employee; omitted fields keep their value
    Edit {
        id: String,
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        dept: Option<String>,
        #[arg(long)]
        hire_date: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete an employee record
    Delete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: EmployeesCommands, logger: Option<&LoggingService>) -> Result<()> {
    let mut app = App::open(logger)?;

    match command {
        EmployeesCommands::List { json } => {
            if json {
                let service = app.ctx.employees();
                println!("{}", serde_json::to_string_pretty(service.list()?)?);
                return Ok(());
            }
            app.show(Route::Employees)
        }
        EmployeesCommands::Add { employee_id, email, position, dept, hire_date, json } => {
            let outcome = app.dispatch(
                Command::new(EntityKind::Employee, Operation::Create).with_payload(json!({
                    "employeeId": employee_id,
                    "email": email,
                    "position": position,
                    "dept": dept,
                    "hireDate": hire_date,
                })),
                json,
            )?;
            if !json {
                success(&format!("Created employee {}", outcome.id));
            }
            Ok(())
        }
        EmployeesCommands::Edit { id, employee_id, email, position, dept, hire_date, json } => {
            let id = resolve_id(&app.ctx.directory.employees, &id)?;
            let current = app
                .ctx
                .directory
                .employees
                .get(id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Employee {} not found", id))?;
            app.dispatch(
                Command::new(EntityKind::Employee, Operation::Update)
                    .with_id(id)
                    .with_payload(json!({
                        "employeeId": employee_id.unwrap_or(current.employee_id),
                        "email": email.unwrap_or(current.email),
                        "position": position.unwrap_or(current.position),
                        "dept": dept.unwrap_or(current.dept),
                        "hireDate": hire_date.unwrap_or_else(|| current.hire_date.to_string()),
                    })),
                json,
            )?;
            if !json {
                success("Employee updated");
            }
            Ok(())
        }
        EmployeesCommands::Delete { id, force, json } => {
            let id = resolve_id(&app.ctx.directory.employees, &id)?;
            if !confirm_delete(&format!("employee {}", id), force || json)? {
                println!("Cancelled.");
                return Ok(());
            }
            app.dispatch(Command::new(EntityKind::Employee, Operation::Delete).with_id(id), json)?;
            if !json {
                success("Employee deleted");
            }
            Ok(())
        }
    }
}
