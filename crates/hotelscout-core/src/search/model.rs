//! Search domain models.

use serde::{Deserialize, Serialize};

/// One city match from a location lookup, offered to the user as a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationChoice {
    /// Human-readable caption, e.g. "Lisbon, Portugal"
    pub name: String,
    /// Provider destination id
    pub destination_id: u64,
}

/// A normalized hotel record as produced by the provider adapter.
///
/// Request-scoped and immutable; never persisted beyond one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub name: String,
    pub address: String,
    /// Exact nightly price used for sorting
    pub price_exact: f64,
    /// Price as displayed by the provider, e.g. "$128"
    pub price: String,
    /// Price annotation, e.g. "nightly price per room"
    pub price_info: String,
    /// Distance to the city center as displayed, e.g. "1.2 km"
    pub to_center: String,
    /// Exact distance to the city center in km. Absent when the provider
    /// does not report a city-center landmark for this hotel.
    pub to_center_exact: Option<f64>,
    pub photo_url: String,
}

/// One page of hotel records, ordered as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelPage {
    pub records: Vec<HotelRecord>,
    /// Next page number as reported by the provider pagination block.
    /// Zero when no further pages exist.
    pub next_page_number: u32,
}

/// Result of an executed search command: the chosen records plus an
/// optional note explaining substitutions or a short result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub hotels: Vec<HotelRecord>,
    pub note: String,
}

impl SearchOutcome {
    pub fn new(hotels: Vec<HotelRecord>, note: impl Into<String>) -> Self {
        Self {
            hotels,
            note: note.into(),
        }
    }

    /// Appends the "found only K" note when fewer hotels than requested
    /// were selected.
    pub fn with_size_note(mut self, requested: usize) -> Self {
        if self.hotels.len() < requested {
            if !self.note.is_empty() {
                self.note.push('\n');
            }
            self.note
                .push_str(&format!("Offers found: {}", self.hotels.len()));
        }
        self
    }
}
