//! Auth commands - register, verify, login, logout, whoami

use std::thread;
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;
use serde_json::json;

use staffhub_core::services::RegistrationInput;
use staffhub_core::LoggingService;

use super::{password_or_prompt, App};
use crate::output::{info, success};

fn field_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

pub fn run_register(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    logger: Option<&LoggingService>,
) -> Result<()> {
    let mut app = App::open(logger)?;

    let input = RegistrationInput {
        first_name: field_or_prompt(first_name, "First name")?,
        last_name: field_or_prompt(last_name, "Last name")?,
        email: field_or_prompt(email, "Email")?,
        password: password_or_prompt(password, "Password", true)?,
    };
    let account = app.ctx.auth().register(input)?;

    success(&format!("Registered {} as {}", account.email, account.role));
    app.render()
}

/// Simulate following the verification link, then wait for the redirect to sign-in
pub fn run_verify(email: Option<String>, no_wait: bool, logger: Option<&LoggingService>) -> Result<()> {
    let mut app = App::open(logger)?;

    let account = app.ctx.auth().verify_email(email.as_deref(), Instant::now())?;
    success(&format!("{} is verified", account.email));
    app.render()?;

    if no_wait {
        return Ok(());
    }
    if let Some(pending) = app.ctx.navigator.scheduled() {
        info("Redirecting to sign in...");
        thread::sleep(pending.due_at.saturating_duration_since(Instant::now()));
    }
    if app.ctx.navigator.run_due(Instant::now()).is_some() {
        app.render()?;
    }
    Ok(())
}

pub fn run_login(email: &str, password: Option<String>, logger: Option<&LoggingService>) -> Result<()> {
    let mut app = App::open(logger)?;

    let password = password_or_prompt(password, "Password", false)?;
    let account = app.ctx.auth().login(email, &password)?;

    success(&format!("Signed in as {}", account.full_name()));
    app.render()
}

pub fn run_logout(logger: Option<&LoggingService>) -> Result<()> {
    let mut app = App::open(logger)?;

    if !app.ctx.session().is_logged_in() {
        println!("{}", "Not signed in.".dimmed());
        return Ok(());
    }
    app.ctx.auth().logout()?;
    success("Signed out");
    app.render()
}

pub fn run_whoami(json: bool, logger: Option<&LoggingService>) -> Result<()> {
    let app = App::open(logger)?;
    let session = app.ctx.session();

    if json {
        let user = session.current_user().map(|u| {
            json!({
                "id": u.id,
                "firstName": u.first_name,
                "lastName": u.last_name,
                "email": u.email,
                "role": u.role,
            })
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({"state": session.state(), "user": user}))?
        );
        return Ok(());
    }

    match session.current_user() {
        Some(user) => println!(
            "{} <{}> {}",
            user.full_name().bold(),
            user.email,
            format!("({})", user.role).dimmed()
        ),
        None => println!("{}", "Not signed in.".dimmed()),
    }
    Ok(())
}
