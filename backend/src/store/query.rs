//! Parameterized aggregate queries

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use shared::Location;

const SELECT_FIELDS: &str = "c.location, c.windowEndTime, c.avgIceThicknessCm, \
c.avgSurfaceTemperatureC, c.maxSnowAccumulationCm, c.avgExternalTemperatureC, c.safetyStatus";

/// A read against the aggregate collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateQuery {
    /// The single record with the greatest window end for a location
    Latest { location: &'static Location },

    /// Every record for a location with window end at or after `cutoff`,
    /// ascending by window end
    Since {
        location: &'static Location,
        cutoff: DateTime<Utc>,
    },
}

/// SQL text plus bound parameters, in the shape the store expects as a body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pub query: String,
    pub parameters: Vec<QueryParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParameter {
    pub name: &'static str,
    pub value: Value,
}

impl AggregateQuery {
    pub fn latest(location: &'static Location) -> Self {
        AggregateQuery::Latest { location }
    }

    pub fn since(location: &'static Location, cutoff: DateTime<Utc>) -> Self {
        AggregateQuery::Since { location, cutoff }
    }

    pub fn location(&self) -> &'static Location {
        match self {
            AggregateQuery::Latest { location } | AggregateQuery::Since { location, .. } => {
                location
            }
        }
    }

    /// Build the parameterized query text for this read
    pub fn to_spec(&self) -> QuerySpec {
        match self {
            AggregateQuery::Latest { location } => QuerySpec {
                query: format!(
                    "SELECT TOP 1 {SELECT_FIELDS} FROM c \
                     WHERE c.location = @loc \
                     ORDER BY c.windowEndTime DESC"
                ),
                parameters: vec![QueryParameter::new("@loc", location.name)],
            },
            AggregateQuery::Since { location, cutoff } => QuerySpec {
                query: format!(
                    "SELECT {SELECT_FIELDS} FROM c \
                     WHERE c.location = @loc AND c.windowEndTime >= @since \
                     ORDER BY c.windowEndTime ASC"
                ),
                parameters: vec![
                    QueryParameter::new("@loc", location.name),
                    QueryParameter::new("@since", format_cutoff(*cutoff)),
                ],
            },
        }
    }
}

impl QueryParameter {
    fn new(name: &'static str, value: impl Into<Value>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Render a cutoff the way window end times are stored: UTC, millisecond
/// precision, `Z` suffix. Comparison in the store is lexicographic.
pub fn format_cutoff(cutoff: DateTime<Utc>) -> String {
    cutoff.to_rfc3339_opts(SecondsFormat::Millis, true)
}
