//! # dormdine_core
//!
//! Core domain logic for DormDine: document storage, sessions, payments and
//! the resource operations behind the HTTP routes.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod payments;
pub mod resources;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
