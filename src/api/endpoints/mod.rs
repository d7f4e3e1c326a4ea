//! API endpoint handlers.

pub mod ask;
pub mod conditions;
pub mod diagnose;
pub mod health;
pub mod home;
pub mod sessions;
