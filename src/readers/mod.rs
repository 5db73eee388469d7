pub mod forecast_reader;
pub mod source_resolver;

pub use forecast_reader::{parse_temperature, ForecastReader};
pub use source_resolver::SourceResolver;
