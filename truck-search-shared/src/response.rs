//! Vendor-grouped payload returned to clients of the query endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One physical location and schedule entry for a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub hours: String,
    pub schedule: String,
    pub address: String,
    pub location: Value,
}

/// All branches of a single vendor matched by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorResult {
    /// The vendor name (the `applicant` field of its documents).
    pub name: String,
    /// Normalized food items, lowercase and trimmed.
    pub fooditems: Vec<String>,
    pub branches: Vec<Branch>,
    /// Whether the vendor is a drinks ("COLD TRUCK") vendor.
    pub drinks: bool,
}

/// Body of every response of the query endpoint.
///
/// Failures are reported in-band with `"status": "failure"` so clients always
/// receive the same envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResponsePayload {
    Success {
        trucks: Vec<VendorResult>,
        /// Number of distinct vendors.
        hits: usize,
        /// Total number of branches across all vendors.
        locations: usize,
    },
    Failure {
        msg: String,
    },
}

impl ResponsePayload {
    /// Build a success payload, deriving the vendor and location counts.
    pub fn success(trucks: Vec<VendorResult>) -> Self {
        let hits = trucks.len();
        let locations = trucks.iter().map(|truck| truck.branches.len()).sum();
        Self::Success {
            trucks,
            hits,
            locations,
        }
    }

    /// Build a failure payload with a client-facing message.
    pub fn failure(msg: impl Into<String>) -> Self {
        Self::Failure { msg: msg.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The vendors of a success payload; empty for failures.
    pub fn trucks(&self) -> &[VendorResult] {
        match self {
            Self::Success { trucks, .. } => trucks,
            Self::Failure { .. } => &[],
        }
    }
}
