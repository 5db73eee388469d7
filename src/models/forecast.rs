/// One `(dataDate, temperature)` entry of a `MaxT` or `MinT` daily series
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReading {
    pub date: String,
    pub temperature: Option<f64>,
}

impl DailyReading {
    pub fn new(date: impl Into<String>, temperature: Option<f64>) -> Self {
        Self {
            date: date.into(),
            temperature,
        }
    }
}

/// A single location as extracted from the feed, with its two parallel series
#[derive(Debug, Clone, PartialEq)]
pub struct LocationForecast {
    /// Stored as given; an empty name is still a distinct location
    pub name: String,
    pub max_series: Vec<DailyReading>,
    pub min_series: Vec<DailyReading>,
}

/// A `(date, max, min)` triple ready to be upserted
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTemperatureRow {
    pub date: String,
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,
}

impl LocationForecast {
    pub fn new(
        name: String,
        max_series: Vec<DailyReading>,
        min_series: Vec<DailyReading>,
    ) -> Self {
        Self {
            name,
            max_series,
            min_series,
        }
    }

    /// Pair the series position by position, stopping at the shorter one.
    /// The date of each row comes from the `MaxT` entry.
    pub fn daily_rows(&self) -> Vec<DailyTemperatureRow> {
        self.max_series
            .iter()
            .zip(self.min_series.iter())
            .map(|(max, min)| DailyTemperatureRow {
                date: max.date.clone(),
                max_temp_c: max.temperature,
                min_temp_c: min.temperature,
            })
            .collect()
    }

    /// Positions where `MaxT` and `MinT` disagree on the date
    pub fn mismatched_dates(&self) -> Vec<(&str, &str)> {
        self.max_series
            .iter()
            .zip(self.min_series.iter())
            .filter(|(max, min)| max.date != min.date)
            .map(|(max, min)| (max.date.as_str(), min.date.as_str()))
            .collect()
    }
}
