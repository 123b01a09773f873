//! Result aggregator.
//!
//! Groups per-location hits into one result per vendor.

use std::collections::HashMap;
use tracing::{debug, instrument};

use truck_search_shared::{Branch, ResponsePayload, SearchHit, VendorResult, NOT_AVAILABLE};

/// Marker vendors put in front of their food items when they sell drinks.
const DRINKS_MARKER: &str = "COLD TRUCK";

/// Normalize a raw food items descriptor.
///
/// The descriptor is split on `:` and every item is trimmed and lowercased.
/// A leading "cold truck" segment is a marker rather than a food item and is
/// dropped. A blank descriptor yields no items.
///
/// ```
/// use truck_search_query::format_food_items;
///
/// assert_eq!(format_food_items("COLD TRUCK: coffee : tea"), vec!["coffee", "tea"]);
/// assert_eq!(format_food_items("burgers : fries"), vec!["burgers", "fries"]);
/// ```
pub fn format_food_items(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut items: Vec<String> = raw.split(':').map(|item| item.trim().to_lowercase()).collect();
    if items[0].contains("cold truck") {
        items.remove(0);
    }
    items
}

/// Per-vendor state while walking the hits.
struct VendorAccumulator<'a> {
    name: &'a str,
    branches: Vec<Branch>,
    /// Raw food items of the last location-bearing hit.
    fooditems: &'a str,
}

impl VendorAccumulator<'_> {
    fn finish(self) -> VendorResult {
        VendorResult {
            name: self.name.to_string(),
            fooditems: format_food_items(self.fooditems),
            branches: self.branches,
            drinks: self.fooditems.contains(DRINKS_MARKER),
        }
    }
}

/// Aggregator that shapes search hits into the client payload.
#[derive(Debug, Default)]
pub struct ResultAggregator {}

impl ResultAggregator {
    /// Create a new result aggregator.
    pub fn new() -> Self {
        Self {}
    }

    /// Group `hits` by vendor in a single forward pass.
    ///
    /// - Vendors appear in the order they are first seen.
    /// - Every hit with a location adds a branch to its vendor; hits without
    ///   one only make the vendor known.
    /// - A vendor's food items and drinks flag come from its last hit with a
    ///   location.
    /// - Hits without an applicant are skipped.
    #[instrument(skip(self, hits), fields(hit_count = hits.len()))]
    pub fn aggregate(&self, hits: &[SearchHit]) -> ResponsePayload {
        let mut vendors: Vec<VendorAccumulator<'_>> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for hit in hits {
            let doc = &hit.document;
            let Some(applicant) = doc.applicant.as_deref() else {
                debug!(doc_id = %hit.id, "Skipping hit with no applicant");
                continue;
            };

            let position = *positions.entry(applicant).or_insert_with(|| {
                vendors.push(VendorAccumulator {
                    name: applicant,
                    branches: Vec::new(),
                    fooditems: "",
                });
                vendors.len() - 1
            });

            if let Some(location) = &doc.location {
                let vendor = &mut vendors[position];
                vendor.branches.push(Branch {
                    hours: or_not_available(doc.dayshours.as_deref()),
                    schedule: or_not_available(doc.schedule.as_deref()),
                    address: or_not_available(doc.address.as_deref()),
                    location: location.clone(),
                });
                vendor.fooditems = doc.fooditems.as_deref().unwrap_or("");
            }
        }

        let trucks: Vec<VendorResult> = vendors.into_iter().map(VendorAccumulator::finish).collect();
        debug!(vendor_count = trucks.len(), "Aggregated hits");
        ResponsePayload::success(trucks)
    }
}

fn or_not_available(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}
