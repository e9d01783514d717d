//! Shared types and models for the Rideau Canal Ice Watch dashboard
//!
//! Holds the location registry, the stored and served record shapes, and the
//! safety status rules used by the backend.

pub mod models;

pub use models::*;
