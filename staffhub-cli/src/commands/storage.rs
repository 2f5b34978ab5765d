//! Storage command - inspect or reset the key-value store

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use staffhub_core::{LoggingService, STORE_FILENAME};

use super::{get_data_dir, App};
use crate::output::{create_table, format_size, success, warning};

#[derive(Subcommand)]
pub enum StorageCommands {
    /// Show layout, keys and sizes
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Delete all stored data and reseed
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(command: StorageCommands, logger: Option<&LoggingService>) -> Result<()> {
    let mut app = App::open(logger)?;

    match command {
        StorageCommands::Show { json } => {
            let db_path = get_data_dir().join(STORE_FILENAME);
            let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

            let mut keys = Vec::new();
            for key in app.ctx.store.keys()? {
                let len = app.ctx.store.get(&key)?.map(|v| v.len()).unwrap_or(0);
                keys.push((key, len));
            }

            if json {
                let keys: Vec<_> = keys
                    .iter()
                    .map(|(key, len)| serde_json::json!({"key": key, "bytes": len}))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "layout": app.ctx.config.storage_layout,
                        "blob_key": app.ctx.config.blob_key,
                        "database_path": db_path.to_string_lossy(),
                        "database_size_bytes": size_bytes,
                        "keys": keys,
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Storage".bold());
            println!("  Layout: {:?}", app.ctx.config.storage_layout);
            println!("  Database: {}", db_path.display());
            println!("  Size: {}", format_size(size_bytes));
            println!();

            let mut table = create_table();
            table.set_header(vec!["Key", "Size"]);
            for (key, len) in keys {
                table.add_row(vec![key, format_size(len as u64)]);
            }
            println!("{}", table);
        }
        StorageCommands::Reset { force } => {
            if !force {
                warning("This deletes every account, department, employee and request.");
                if !Confirm::new()
                    .with_prompt("Reset storage?")
                    .default(false)
                    .interact()?
                {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let reports = app.ctx.reset_storage()?;
            for report in &reports {
                println!("  {}", report.to_string().dimmed());
            }
            success("Storage reset");
        }
    }

    Ok(())
}
