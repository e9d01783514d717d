//! Sensor aggregate records as stored and as served to the dashboard

use serde::{Deserialize, Serialize};

use super::location::Location;
use super::status::SafetyStatus;

/// Aggregate document as written by the ingestion pipeline.
///
/// Every field is optional so that a malformed document still maps; absent
/// fields stay absent in the served record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorAggregateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_ice_thickness_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_surface_temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_snow_accumulation_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_external_temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_status: Option<String>,
}

/// Record shape served to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRecord {
    pub sensor_id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Window end as keyed by `/api/latest`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Window end as keyed by `/api/history`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_ice_thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_surface_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_snow_accumulation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_external_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_status: Option<SafetyStatus>,
}

impl DashboardRecord {
    /// Map a stored aggregate into the served shape, keyed for `/api/latest`.
    ///
    /// Metric values are copied as-is. Missing fields and unrecognized
    /// statuses are logged and left out of the output.
    pub fn from_stored(location: &Location, stored: SensorAggregateRecord) -> Self {
        let missing = stored.missing_fields();
        if !missing.is_empty() {
            tracing::warn!(
                sensor_id = location.id,
                missing = ?missing,
                "Aggregate document is missing fields"
            );
        }

        let safety_status = stored.safety_status.as_deref().and_then(|raw| {
            raw.parse::<SafetyStatus>()
                .map_err(|e| tracing::warn!(sensor_id = location.id, "{}", e))
                .ok()
        });

        Self {
            sensor_id: location.id,
            location: stored.location,
            timestamp: stored.window_end_time,
            window_end_time: None,
            avg_ice_thickness: stored.avg_ice_thickness_cm,
            avg_surface_temperature: stored.avg_surface_temperature_c,
            max_snow_accumulation: stored.max_snow_accumulation_cm,
            avg_external_temperature: stored.avg_external_temperature_c,
            safety_status,
        }
    }

    /// Re-key the window end for `/api/history`
    pub fn into_history(mut self) -> Self {
        if let Some(value) = self.timestamp.take() {
            self.window_end_time = Some(value);
        }
        self
    }

    /// Window end instant under whichever key this record carries
    pub fn window_end_time(&self) -> Option<&str> {
        self.timestamp
            .as_deref()
            .or(self.window_end_time.as_deref())
    }
}

impl SensorAggregateRecord {
    /// Names of stored fields absent from this document
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("location", self.location.is_none()),
            ("windowEndTime", self.window_end_time.is_none()),
            ("avgIceThicknessCm", self.avg_ice_thickness_cm.is_none()),
            ("avgSurfaceTemperatureC", self.avg_surface_temperature_c.is_none()),
            ("maxSnowAccumulationCm", self.max_snow_accumulation_cm.is_none()),
            ("avgExternalTemperatureC", self.avg_external_temperature_c.is_none()),
            ("safetyStatus", self.safety_status.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}
