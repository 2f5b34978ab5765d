//! Profile command - the signed-in user's own account

use anyhow::{bail, Result};
use clap::Subcommand;

use staffhub_core::{LoggingService, Route};

use super::{password_or_prompt, App};
use crate::output::success;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your profile
    Show,
    /// Change your name
    Edit {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Change your password
    Password {
        /// Current password (prompted if omitted)
        #[arg(long)]
        current: Option<String>,
        /// New password (prompted if omitted)
        #[arg(long)]
        new: Option<String>,
    },
}

pub fn run(command: Option<ProfileCommands>, logger: Option<&LoggingService>) -> Result<()> {
    let mut app = App::open(logger)?;

    match command.unwrap_or(ProfileCommands::Show) {
        ProfileCommands::Show => app.show(Route::Profile),
        ProfileCommands::Edit { first_name, last_name } => {
            if first_name.is_none() && last_name.is_none() {
                bail!("Nothing to change. Pass --first-name and/or --last-name.");
            }
            let current = app.ctx.auth().profile()?.clone();
            app.ctx.auth().update_profile(
                first_name.as_deref().unwrap_or(&current.first_name),
                last_name.as_deref().unwrap_or(&current.last_name),
            )?;
            success("Profile updated");
            app.render()
        }
        ProfileCommands::Password { current, new } => {
            // Fail before prompting when nobody is signed in
            app.ctx.session().require_login()?;
            let current = password_or_prompt(current, "Current password", false)?;
            let new = password_or_prompt(new, "New password", true)?;
            app.ctx.auth().change_password(&current, &new)?;
            success("Password changed");
            Ok(())
        }
    }
}
