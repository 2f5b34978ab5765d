//! Terminal output: status lines, tables and small cell formatters

use colored::{ColoredString, Colorize};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use uuid::Uuid;

/// Characters of an id shown in tables; any unique prefix resolves back
const SHORT_ID_LEN: usize = 8;

enum Tone {
    Success,
    Warning,
    Info,
}

fn status_line(tone: Tone, msg: &str) {
    let styled: ColoredString = match tone {
        Tone::Success => format!("✓ {}", msg).green(),
        Tone::Warning => format!("! {}", msg).yellow(),
        Tone::Info => msg.cyan(),
    };
    println!("{}", styled);
}

pub fn success(msg: &str) {
    status_line(Tone::Success, msg);
}

pub fn warning(msg: &str) {
    status_line(Tone::Warning, msg);
}

pub fn info(msg: &str) {
    status_line(Tone::Info, msg);
}

/// Errors go to stderr so `--json` output on stdout stays parseable
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg.red());
}

/// Table for record listings
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn short_id(id: Uuid) -> String {
    id.simple().to_string().chars().take(SHORT_ID_LEN).collect()
}

pub fn yes_no(value: bool) -> String {
    match value {
        true => "yes".green().to_string(),
        false => "no".dimmed().to_string(),
    }
}

/// Size in the largest binary unit that keeps the value at or above one
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
