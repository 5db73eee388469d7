pub mod temperature_viewer;

pub use temperature_viewer::{OutputFormat, StoreStatistics, TemperatureQuery, TemperatureViewer};
