use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Sentinel written to the CSV when a source field is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// One extracted real-estate listing, shaped for the output CSV.
///
/// All fields are kept textual: the structured-data path yields JSON numbers
/// while the selector path yields element text, and both render the same way
/// in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Capture date, `YYYY-MM-DD`.
    #[serde(rename = "FechaDescarga")]
    pub fecha_descarga: String,
    /// Neighborhood name.
    #[serde(rename = "Barrio")]
    pub barrio: String,
    /// Price with currency markers and grouping dots stripped.
    #[serde(rename = "Valor")]
    pub valor: String,
    #[serde(rename = "NumHabitaciones")]
    pub habitaciones: String,
    #[serde(rename = "NumBanos")]
    pub banos: String,
    /// Floor area in square meters.
    #[serde(rename = "mts2")]
    pub mts2: String,
}

/// Today's date in the form every storage key and record uses.
pub fn capture_date() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
