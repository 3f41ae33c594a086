use serde::Serialize;
use utoipa::ToSchema;

/// Neutral weather condition identifier, independent of any icon set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    ClearDay,
    ClearNight,
    PartlyCloudy,
    #[default]
    Cloudy,
    Overcast,
    Showers,
    RainDay,
    RainNight,
    Thunderstorm,
    Snow,
    Fog,
}

impl Condition {
    /// Map an OpenWeatherMap icon code ("01d", "10n", ...) to a condition.
    /// Unknown codes fall back to `Cloudy`.
    pub fn from_icon_code(code: &str) -> Self {
        match code {
            "01d" => Self::ClearDay,
            "01n" => Self::ClearNight,
            "02d" | "02n" => Self::PartlyCloudy,
            "03d" | "03n" => Self::Cloudy,
            "04d" | "04n" => Self::Overcast,
            "09d" | "09n" => Self::Showers,
            "10d" => Self::RainDay,
            "10n" => Self::RainNight,
            "11d" | "11n" => Self::Thunderstorm,
            "13d" | "13n" => Self::Snow,
            "50d" | "50n" => Self::Fog,
            _ => Self::Cloudy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClearDay => "clear-day",
            Self::ClearNight => "clear-night",
            Self::PartlyCloudy => "partly-cloudy",
            Self::Cloudy => "cloudy",
            Self::Overcast => "overcast",
            Self::Showers => "showers",
            Self::RainDay => "rain-day",
            Self::RainNight => "rain-night",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Fog => "fog",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True for the daytime variant of an icon code ("10d")
pub fn is_daytime_code(code: &str) -> bool {
    code.ends_with('d')
}

/// Eight-point compass direction for a wind bearing in degrees
pub fn compass_direction(degrees: f64) -> &'static str {
    let deg = degrees.rem_euclid(360.0);
    if deg > 337.5 || deg <= 22.5 {
        "N"
    } else if deg <= 67.5 {
        "NE"
    } else if deg <= 112.5 {
        "E"
    } else if deg <= 157.5 {
        "SE"
    } else if deg <= 202.5 {
        "S"
    } else if deg <= 247.5 {
        "SW"
    } else if deg <= 292.5 {
        "W"
    } else {
        "NW"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_night_variants() {
        assert_eq!(Condition::from_icon_code("01d"), Condition::ClearDay);
        assert_eq!(Condition::from_icon_code("01n"), Condition::ClearNight);
        assert_eq!(Condition::from_icon_code("10d"), Condition::RainDay);
        assert_eq!(Condition::from_icon_code("10n"), Condition::RainNight);
    }

    #[test]
    fn test_shared_variants() {
        for code in ["11d", "11n"] {
            assert_eq!(Condition::from_icon_code(code), Condition::Thunderstorm);
        }
        assert_eq!(Condition::from_icon_code("04n"), Condition::Overcast);
        assert_eq!(Condition::from_icon_code("50d"), Condition::Fog);
    }

    #[test]
    fn test_unknown_code_defaults_to_cloudy() {
        assert_eq!(Condition::from_icon_code("99x"), Condition::Cloudy);
        assert_eq!(Condition::from_icon_code(""), Condition::Cloudy);
    }

    #[test]
    fn test_condition_serializes_kebab_case() {
        let json = serde_json::to_string(&Condition::PartlyCloudy).unwrap();
        assert_eq!(json, "\"partly-cloudy\"");
        assert_eq!(Condition::RainNight.to_string(), "rain-night");
    }

    #[test]
    fn test_is_daytime_code() {
        assert!(is_daytime_code("02d"));
        assert!(!is_daytime_code("02n"));
        assert!(!is_daytime_code(""));
    }

    #[test]
    fn test_compass_direction_boundaries() {
        assert_eq!(compass_direction(0.0), "N");
        assert_eq!(compass_direction(22.5), "N");
        assert_eq!(compass_direction(22.6), "NE");
        assert_eq!(compass_direction(90.0), "E");
        assert_eq!(compass_direction(180.0), "S");
        assert_eq!(compass_direction(270.0), "W");
        assert_eq!(compass_direction(337.5), "NW");
        assert_eq!(compass_direction(337.6), "N");
        assert_eq!(compass_direction(360.0), "N");
    }
}
