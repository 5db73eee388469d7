use serde::{Deserialize, Serialize};

/// A daily temperature row joined with its location name, as read back from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTemperature {
    pub location_id: i64,
    pub location: String,
    pub date: String,
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,
}

impl StoredTemperature {
    pub fn format_temp(value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{:.1}", v),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub id: i64,
    pub name: String,
    pub days: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}
