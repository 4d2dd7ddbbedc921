pub mod auth;
pub mod progress;
pub mod quiz;
pub mod stats;
