//! Dashboard service: latest readings, one-hour history and overall status

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use shared::{derive_overall_status, DashboardRecord, Location, OverallStatus};
use std::sync::Arc;

use crate::error::DashboardError;
use crate::store::{AggregateQuery, AggregateStore, StoreError};

/// How far back the history view reaches
pub const HISTORY_WINDOW_MINUTES: i64 = 60;

/// Dashboard service over an aggregate store
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn AggregateStore>,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(store: Arc<dyn AggregateStore>) -> Self {
        Self { store }
    }

    /// Latest record for one location, or `None` if it has no data yet
    pub async fn latest_for_location(
        &self,
        location: &'static Location,
    ) -> Result<Option<DashboardRecord>, StoreError> {
        let records = self.store.query(&AggregateQuery::latest(location)).await?;

        Ok(records
            .into_iter()
            .next()
            .map(|stored| DashboardRecord::from_stored(location, stored)))
    }

    /// Latest record for every location, in registry order.
    ///
    /// Locations without data are left out. All locations are queried
    /// concurrently and each query runs to completion; if any failed, the
    /// first failure in registry order is returned.
    pub async fn latest_per_location(&self) -> Result<Vec<DashboardRecord>, StoreError> {
        let results = join_all(Location::all().map(|location| async move {
            self.latest_for_location(location).await.map_err(|e| {
                tracing::error!(sensor_id = location.id, error = %e, "Latest query failed");
                e
            })
        }))
        .await;

        let mut records = Vec::with_capacity(results.len());
        for result in results {
            if let Some(record) = result? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Records for one location from the hour before `now`, ascending by
    /// window end
    pub async fn history_since(
        &self,
        sensor_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<DashboardRecord>, DashboardError> {
        let location = Location::by_id(sensor_id)
            .ok_or_else(|| DashboardError::UnknownLocation(sensor_id.to_string()))?;

        let cutoff = now - Duration::minutes(HISTORY_WINDOW_MINUTES);
        let records = self
            .store
            .query(&AggregateQuery::since(location, cutoff))
            .await
            .map_err(|e| {
                tracing::error!(sensor_id = location.id, error = %e, "History query failed");
                e
            })?;

        tracing::debug!(sensor_id = location.id, count = records.len(), "Loaded history");

        Ok(records
            .into_iter()
            .map(|stored| DashboardRecord::from_stored(location, stored).into_history())
            .collect())
    }

    /// Most severe status across every location's latest record
    pub async fn overall_status(&self) -> Result<OverallStatus, StoreError> {
        let latest = self.latest_per_location().await?;
        Ok(derive_overall_status(
            latest.iter().filter_map(|record| record.safety_status),
        ))
    }

    /// Short name of the backing store
    pub fn store_kind(&self) -> &'static str {
        self.store.kind()
    }
}
