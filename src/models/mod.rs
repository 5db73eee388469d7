pub mod forecast;
pub mod stored;

pub use forecast::{DailyReading, DailyTemperatureRow, LocationForecast};
pub use stored::{LocationSummary, StoredTemperature};
