use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Current conditions at the destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub condition: String,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<f64>,
}

/// One day of forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub condition: String,
    /// Percent, 0-100
    #[serde(default)]
    pub precipitation_chance: u8,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub humidity: f64,
}

impl ForecastDay {
    /// Rain likely enough that outdoor plans should have an indoor backup.
    pub fn is_wet(&self) -> bool {
        self.precipitation_chance >= 60
    }
}

/// Weather for a destination. `Default` is the neutral "no data" snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
    #[serde(default)]
    pub alerts: Vec<WeatherAlert>,
}

impl WeatherSnapshot {
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.forecast.is_empty() && self.alerts.is_empty()
    }

    pub fn forecast_for(&self, date: NaiveDate) -> Option<&ForecastDay> {
        self.forecast.iter().find(|day| day.date == date)
    }

    /// One line per forecast day, used when describing conditions in prompts.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(current) = &self.current {
            lines.push(format!(
                "Now: {} {:.0}°, humidity {:.0}%",
                current.condition, current.temperature, current.humidity
            ));
        }
        for day in &self.forecast {
            lines.push(format!(
                "{}: {} {:.0}°/{:.0}°, {}% rain",
                day.date, day.condition, day.high, day.low, day.precipitation_chance
            ));
        }
        for alert in &self.alerts {
            lines.push(format!("Alert ({}): {}", alert.severity, alert.message));
        }
        lines
    }
}

/// A local event happening during the trip window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocalEvent {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub ticket_price: f64,
}

/// A weather warning fed into real-time updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherAlert {
    /// e.g. "storm", "heatwave"
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub message: String,
    #[serde(default)]
    pub affected_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// A traffic condition fed into real-time updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrafficUpdate {
    pub route: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub delay_minutes: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}
