//! View hooks port - the contract with whatever renders pages

use crate::domain::{NavAffordances, Route, View};

/// Rendering callbacks invoked by the core
///
/// The core never renders anything itself. It signals which page is
/// active, which data views went stale and what the navigation bar
/// should offer; implementations pull the data they need afterwards.
pub trait ViewHooks: Send + Sync {
    /// Make `page` the single visible page
    fn render_page(&self, page: Route);

    /// Re-render the data shown by `view`
    fn refresh_view(&self, view: View);

    /// Update the navigation bar after an authentication change
    fn update_navigation(&self, nav: &NavAffordances);
}
