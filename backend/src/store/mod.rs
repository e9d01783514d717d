//! Read access to the sensor aggregate collection

use async_trait::async_trait;
use shared::SensorAggregateRecord;
use thiserror::Error;

pub mod memory;
pub mod query;

pub use memory::MemoryStore;
pub use query::{AggregateQuery, QueryParameter, QuerySpec};

/// Errors raised by an aggregate store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(String),

    #[error("Invalid store credentials: {0}")]
    Credentials(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A document store holding sensor aggregates, partitioned by location
#[async_trait]
pub trait AggregateStore: Send + Sync {
    /// Run a query and return every matching document.
    ///
    /// One call is one round-trip (following result pages); no caching or
    /// retry happens at this layer.
    async fn query(&self, query: &AggregateQuery)
        -> Result<Vec<SensorAggregateRecord>, StoreError>;

    /// Short name reported by the health endpoint
    fn kind(&self) -> &'static str;
}
