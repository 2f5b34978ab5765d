//! Status command - collection counts and session state

use anyhow::Result;
use colored::Colorize;

use staffhub_core::{LoggingService, SessionState};

use super::App;
use crate::output::create_table;

pub fn run(json: bool, logger: Option<&LoggingService>) -> Result<()> {
    let app = App::open(logger)?;
    let status = app.ctx.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Staffhub Status".bold());
    println!();

    let mut table = create_table();
    table.add_row(vec![
        "Accounts".to_string(),
        format!(
            "{} ({} admin, {} unverified)",
            status.total_accounts, status.admin_accounts, status.unverified_accounts
        ),
    ]);
    table.add_row(vec!["Departments".to_string(), status.total_departments.to_string()]);
    table.add_row(vec!["Employees".to_string(), status.total_employees.to_string()]);
    table.add_row(vec![
        "Requests".to_string(),
        format!("{} ({} pending)", status.total_requests, status.pending_requests),
    ]);
    println!("{}", table);
    println!();

    let session = match (status.session, &status.signed_in_as) {
        (SessionState::Anonymous, _) | (_, None) => "Not signed in".to_string(),
        (SessionState::AuthenticatedAdmin, Some(name)) => format!("Signed in as {} (admin)", name),
        (SessionState::AuthenticatedUser, Some(name)) => format!("Signed in as {}", name),
    };
    println!("{}", session);

    for report in app.ctx.load_reports.iter().filter(|r| r.outcome.was_seeded()) {
        println!("{}", report.to_string().yellow());
    }

    Ok(())
}
