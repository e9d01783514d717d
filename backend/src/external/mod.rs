//! External service integrations

pub mod cosmos;

pub use cosmos::CosmosStore;
