//! Domain models shared by the API layer.

pub mod auth;
pub mod resources;
