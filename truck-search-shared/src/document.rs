//! Food truck documents as stored in, and returned by, the search index.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder for schedule fields a record leaves out.
pub const NOT_AVAILABLE: &str = "NA";

/// One food truck location record.
///
/// Only the fields the service reads are modelled here. Records are indexed
/// as the raw JSON object received from the dataset, so the index may carry
/// more fields than this struct exposes; they are ignored on the way back.
///
/// Reading is lenient: a text field holding anything but a string reads as
/// unset, and `location` is set whenever the key is present, even as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TruckDocument {
    /// Vendor name. Documents are grouped by this field.
    #[serde(default, deserialize_with = "string_or_unset", skip_serializing_if = "Option::is_none")]
    pub applicant: Option<String>,
    /// Colon-delimited food descriptor, e.g. `"COLD TRUCK: soda: chips"`.
    #[serde(default, deserialize_with = "string_or_unset", skip_serializing_if = "Option::is_none")]
    pub fooditems: Option<String>,
    #[serde(default, deserialize_with = "string_or_unset", skip_serializing_if = "Option::is_none")]
    pub dayshours: Option<String>,
    #[serde(default, deserialize_with = "string_or_unset", skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, deserialize_with = "string_or_unset", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Geo point or coordinate object, passed through untouched.
    #[serde(default, deserialize_with = "present_value", skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
}

fn string_or_unset<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

// Only called when the key exists, so an explicit null still counts.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TruckDocument {
    /// Create a document for the given vendor with every other field unset.
    pub fn new(applicant: impl Into<String>) -> Self {
        Self {
            applicant: Some(applicant.into()),
            ..Default::default()
        }
    }

    /// Set the food items descriptor.
    pub fn with_fooditems(mut self, fooditems: impl Into<String>) -> Self {
        self.fooditems = Some(fooditems.into());
        self
    }

    /// Set the opening days and hours.
    pub fn with_dayshours(mut self, dayshours: impl Into<String>) -> Self {
        self.dayshours = Some(dayshours.into());
        self
    }

    /// Set the schedule link.
    pub fn with_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = Some(schedule.into());
        self
    }

    /// Set the street address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the location value.
    pub fn with_location(mut self, location: Value) -> Self {
        self.location = Some(location);
        self
    }

    /// Whether the document can contribute a branch to its vendor.
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }
}

/// A document returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// The document id in the index.
    pub id: String,
    /// Relevance score assigned by the backend, if any.
    pub score: Option<f64>,
    pub document: TruckDocument,
}

impl SearchHit {
    pub fn new(id: impl Into<String>, document: TruckDocument) -> Self {
        Self {
            id: id.into(),
            score: None,
            document,
        }
    }
}
