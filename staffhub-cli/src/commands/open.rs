//! Open command - navigate to a page by hash route or URL

use anyhow::Result;

use staffhub_core::{LoggingService, Route};

use super::App;

pub fn run(location: &str, logger: Option<&LoggingService>) -> Result<()> {
    let mut app = App::open(logger)?;
    app.navigate(Route::from_location(location))?;
    Ok(())
}
