//! Defines the selectable weather variables, the unit system they are requested in,
//! and the two plot modes.

use serde::Deserialize;
use std::fmt;

/// The hourly archive variable a plot is built from.
///
/// Every variable flows through the same pipeline; the variant only decides which
/// archive column is requested and how the result is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherVariable {
    /// Air temperature two meters above ground.
    Temperature,
    /// Total precipitation (rain, showers and snowfall) of the preceding hour.
    Precipitation,
    /// Dew point two meters above ground.
    DewPoint,
}

impl WeatherVariable {
    pub const ALL: [WeatherVariable; 3] = [
        WeatherVariable::Temperature,
        WeatherVariable::Precipitation,
        WeatherVariable::DewPoint,
    ];

    /// The variable name understood by the archive API's `hourly` parameter.
    pub fn api_name(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "temperature_2m",
            WeatherVariable::Precipitation => "precipitation",
            WeatherVariable::DewPoint => "dew_point_2m",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "Temperature",
            WeatherVariable::Precipitation => "Precipitation",
            WeatherVariable::DewPoint => "Dew Point",
        }
    }

    /// Short identifier used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "temperature",
            WeatherVariable::Precipitation => "precipitation",
            WeatherVariable::DewPoint => "dew-point",
        }
    }

    pub fn unit(&self, units: UnitSystem) -> &'static str {
        match self {
            WeatherVariable::Temperature | WeatherVariable::DewPoint => units.temperature_symbol(),
            WeatherVariable::Precipitation => units.precipitation_symbol(),
        }
    }

    /// Axis label, e.g. `Temperature (°F)`.
    pub fn axis_label(&self, units: UnitSystem) -> String {
        format!("{} ({})", self.display_name(), self.unit(units).trim())
    }

    /// Horizontal reference lines drawn on every plot of this variable.
    pub fn reference_lines(&self, units: UnitSystem) -> Vec<ReferenceLine> {
        match self {
            WeatherVariable::Temperature | WeatherVariable::DewPoint => {
                let freezing = units.freezing_point();
                vec![ReferenceLine {
                    value: freezing,
                    label: format!(
                        "Freezing Point ({}{})",
                        freezing,
                        units.temperature_symbol()
                    ),
                }]
            }
            WeatherVariable::Precipitation => Vec::new(),
        }
    }
}

impl fmt::Display for WeatherVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Unit system the archive is asked to report values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Fahrenheit, inches and miles per hour.
    #[default]
    Imperial,
    /// Celsius, millimeters and km/h.
    Metric,
}

impl UnitSystem {
    pub fn temperature_param(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "fahrenheit",
            UnitSystem::Metric => "celsius",
        }
    }

    pub fn precipitation_param(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "inch",
            UnitSystem::Metric => "mm",
        }
    }

    pub fn wind_speed_param(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "mph",
            UnitSystem::Metric => "kmh",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "°F",
            UnitSystem::Metric => "°C",
        }
    }

    pub fn precipitation_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => " in",
            UnitSystem::Metric => " mm",
        }
    }

    pub fn freezing_point(&self) -> f64 {
        match self {
            UnitSystem::Imperial => 32.0,
            UnitSystem::Metric => 0.0,
        }
    }
}

/// A labelled horizontal line at a fixed value, e.g. the freezing point.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: String,
}

/// What kind of plot the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotMode {
    /// Raw hourly series with annotated markers.
    Point,
    /// Daily means smoothed into a trend line.
    Trend,
}

impl PlotMode {
    pub fn slug(&self) -> &'static str {
        match self {
            PlotMode::Point => "plot",
            PlotMode::Trend => "trend",
        }
    }
}

impl fmt::Display for PlotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_names() {
        assert_eq!(WeatherVariable::Temperature.api_name(), "temperature_2m");
        assert_eq!(WeatherVariable::Precipitation.api_name(), "precipitation");
        assert_eq!(WeatherVariable::DewPoint.api_name(), "dew_point_2m");
    }

    #[test]
    fn test_axis_labels() {
        assert_eq!(
            WeatherVariable::Temperature.axis_label(UnitSystem::Imperial),
            "Temperature (°F)"
        );
        assert_eq!(
            WeatherVariable::Precipitation.axis_label(UnitSystem::Imperial),
            "Precipitation (in)"
        );
        assert_eq!(
            WeatherVariable::DewPoint.axis_label(UnitSystem::Metric),
            "Dew Point (°C)"
        );
    }

    #[test]
    fn test_freezing_reference_line() {
        let lines = WeatherVariable::Temperature.reference_lines(UnitSystem::Imperial);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].value, 32.0);
        assert_eq!(lines[0].label, "Freezing Point (32°F)");

        let metric = WeatherVariable::DewPoint.reference_lines(UnitSystem::Metric);
        assert_eq!(metric[0].label, "Freezing Point (0°C)");

        assert!(WeatherVariable::Precipitation
            .reference_lines(UnitSystem::Imperial)
            .is_empty());
    }

    #[test]
    fn test_unit_system_deserializes_lowercase() {
        let units: UnitSystem = serde_json::from_str("\"metric\"").unwrap();
        assert_eq!(units, UnitSystem::Metric);
    }
}
