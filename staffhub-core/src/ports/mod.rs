//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external collaborators: the key-value
//! storage engine and the page renderer. The core depends only on these
//! traits, not on concrete implementations.

mod key_value;
mod view;

pub use key_value::KeyValueStore;
pub use view::ViewHooks;
