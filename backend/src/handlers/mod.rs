//! HTTP handlers for the Ice Watch backend

pub mod dashboard;
pub mod health;

pub use dashboard::*;
pub use health::*;
