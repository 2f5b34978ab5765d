//! Staffhub CLI - a small staff directory in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{accounts, auth, departments, employees, logs, open, profile, requests, status, storage};
use staffhub_core::{LogEvent, LoggingService};

/// Staffhub - accounts, departments, employees and requests
#[derive(Parser)]
#[command(name = "staffhub", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (unverified until `verify`)
    Register {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Follow the simulated verification link
    Verify {
        /// Email to verify (defaults to the last registration)
        email: Option<String>,
        /// Don't wait for the redirect to sign-in
        #[arg(long)]
        no_wait: bool,
    },

    /// Sign in
    Login {
        email: String,
        /// Password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show who is signed in
    Whoami {
        #[arg(long)]
        json: bool,
    },

    /// Open a page by hash route (#/employees) or URL
    Open {
        location: String,
    },

    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: Option<profile::ProfileCommands>,
    },

    /// Manage accounts (admin)
    Accounts {
        #[command(subcommand)]
        command: accounts::AccountsCommands,
    },

    /// Manage departments (admin)
    Departments {
        #[command(subcommand)]
        command: departments::DepartmentsCommands,
    },

    /// Manage employees (admin)
    Employees {
        #[command(subcommand)]
        command: employees::EmployeesCommands,
    },

    /// Manage your requests
    Requests {
        #[command(subcommand)]
        command: requests::RequestsCommands,
    },

    /// Show collection counts and session state
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or reset stored data
    Storage {
        #[command(subcommand)]
        command: storage::StorageCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Command name as logged; never includes arguments
    fn name(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Verify { .. } => "verify",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Open { .. } => "open",
            Commands::Profile { .. } => "profile",
            Commands::Accounts { .. } => "accounts",
            Commands::Departments { .. } => "departments",
            Commands::Employees { .. } => "employees",
            Commands::Requests { .. } => "requests",
            Commands::Status { .. } => "status",
            Commands::Storage { .. } => "storage",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = commands::get_logger();
    let name = cli.command.name();

    if let Some(l) = &logger {
        let _ = l.log_command(name);
    }

    match run(cli, logger.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Logged by kind only; messages can carry emails
            commands::log_failure(
                logger.as_ref(),
                LogEvent::new("command_failed").with_command(name),
                commands::error_kind(&e),
            );
            if !e.is::<commands::Reported>() {
                output::error(&format!("{:#}", e));
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, logger: Option<&LoggingService>) -> Result<()> {
    match cli.command {
        Commands::Register { first_name, last_name, email, password } => {
            auth::run_register(first_name, last_name, email, password, logger)
        }
        Commands::Verify { email, no_wait } => auth::run_verify(email, no_wait, logger),
        Commands::Login { email, password } => auth::run_login(&email, password, logger),
        Commands::Logout => auth::run_logout(logger),
        Commands::Whoami { json } => auth::run_whoami(json, logger),
        Commands::Open { location } => open::run(&location, logger),
        Commands::Profile { command } => profile::run(command, logger),
        Commands::Accounts { command } => accounts::run(command, logger),
        Commands::Departments { command } => departments::run(command, logger),
        Commands::Employees { command } => employees::run(command, logger),
        Commands::Requests { command } => requests::run(command, logger),
        Commands::Status { json } => status::run(json, logger),
        Commands::Storage { command } => storage::run(command, logger),
        Commands::Logs { command } => logs::run(command, logger),
    }
}
