//! Weather classes and the condition-code mapping used by hosts.

use serde::{Deserialize, Serialize};

/// The four weather moods the sky renderer knows how to draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherClass {
    #[default]
    Clear,
    Cloudy,
    Overcast,
    Storm,
}

impl WeatherClass {
    /// All classes in increasing cloudiness.
    pub const ALL: [WeatherClass; 4] = [
        WeatherClass::Clear,
        WeatherClass::Cloudy,
        WeatherClass::Overcast,
        WeatherClass::Storm,
    ];

    /// Index written into the uniform block (matches `WEATHER_*` in the shader).
    #[inline]
    pub fn index(self) -> u32 {
        match self {
            WeatherClass::Clear => 0,
            WeatherClass::Cloudy => 1,
            WeatherClass::Overcast => 2,
            WeatherClass::Storm => 3,
        }
    }

    /// Map a WMO weather-interpretation code (as reported by most weather
    /// services) onto a weather class. Many codes share one class; codes the
    /// table does not know map to `Cloudy`.
    pub fn from_condition_code(code: u16) -> Self {
        match code {
            0 | 1 => WeatherClass::Clear,
            2 => WeatherClass::Cloudy,
            3 => WeatherClass::Overcast,
            // Fog, depositing rime fog
            45 | 48 => WeatherClass::Overcast,
            // Drizzle: light, moderate, dense; freezing drizzle
            51 | 53 | 55 | 56 | 57 => WeatherClass::Overcast,
            // Rain: slight / moderate stays overcast, heavy is a storm
            61 | 63 => WeatherClass::Overcast,
            65 => WeatherClass::Storm,
            // Freezing rain
            66 => WeatherClass::Overcast,
            67 => WeatherClass::Storm,
            // Snow fall and snow grains
            71 | 73 | 77 => WeatherClass::Overcast,
            75 => WeatherClass::Storm,
            // Rain showers
            80 | 81 => WeatherClass::Overcast,
            82 => WeatherClass::Storm,
            // Snow showers
            85 => WeatherClass::Overcast,
            86 => WeatherClass::Storm,
            // Thunderstorm, with or without hail
            95 | 96 | 99 => WeatherClass::Storm,
            _ => WeatherClass::Cloudy,
        }
    }
}
