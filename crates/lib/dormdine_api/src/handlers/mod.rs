//! Request handlers.

pub mod counts;
pub mod health;
pub mod meals;
pub mod payments;
pub mod requests;
pub mod reviews;
pub mod session;
pub mod upcoming;
pub mod users;
