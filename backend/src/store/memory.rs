//! In-process aggregate store
//!
//! Evaluates [`AggregateQuery`] with the same semantics as the document
//! store: string comparison on window end times, `TOP 1` for latest reads.

use async_trait::async_trait;
use shared::SensorAggregateRecord;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::query::{format_cutoff, AggregateQuery};
use super::{AggregateStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<SensorAggregateRecord>,
    failing: HashSet<&'static str>,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new(records: Vec<SensorAggregateRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Make every query for the given sensor id fail
    pub fn failing_for(mut self, sensor_id: &'static str) -> Self {
        self.failing.insert(sensor_id);
        self
    }

    /// Number of queries served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn for_location<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a SensorAggregateRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.location.as_deref() == Some(name))
    }
}

#[async_trait]
impl AggregateStore for MemoryStore {
    async fn query(
        &self,
        query: &AggregateQuery,
    ) -> Result<Vec<SensorAggregateRecord>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let location = query.location();
        if self.failing.contains(location.id) {
            return Err(StoreError::Unavailable(format!(
                "partition for {} is offline",
                location.name
            )));
        }

        let records = match query {
            AggregateQuery::Latest { .. } => self
                .for_location(location.name)
                .filter(|r| r.window_end_time.is_some())
                .max_by(|a, b| a.window_end_time.cmp(&b.window_end_time))
                .cloned()
                .into_iter()
                .collect(),
            AggregateQuery::Since { cutoff, .. } => {
                let since = format_cutoff(*cutoff);
                let mut matched: Vec<_> = self
                    .for_location(location.name)
                    .filter(|r| {
                        r.window_end_time
                            .as_deref()
                            .is_some_and(|t| t >= since.as_str())
                    })
                    .cloned()
                    .collect();
                matched.sort_by(|a, b| a.window_end_time.cmp(&b.window_end_time));
                matched
            }
        };

        Ok(records)
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
