//! Domain entities - Results produced by a single lookup

mod temperature_report;
mod weather_reading;

pub use temperature_report::TemperatureReport;
pub use weather_reading::WeatherReading;
