use std::{fmt, str::FromStr};

/// Health label stored next to every measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NOT OK")]
    NotOk,
}

impl Status {
    pub const OK: &'static str = "OK";
    pub const NOT_OK: &'static str = "NOT OK";

    /// A value is healthy only when it is strictly below its threshold.
    pub fn assess(value: f64, threshold: f64) -> Self {
        if value < threshold {
            Status::Ok
        } else {
            Status::NotOk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => Self::OK,
            Status::NotOk => Self::NOT_OK,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown status label: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::OK => Ok(Status::Ok),
            Self::NOT_OK => Ok(Status::NotOk),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Reading {
    pub current: f64,     // A
    pub temperature: f64, // °C
    pub vibration: f64,   // mm/s
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Thresholds {
    pub current: f64,
    pub temperature: f64,
    pub vibration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub current: Status,
    pub temperature: Status,
    pub vibration: Status,
}

impl Thresholds {
    pub fn assess(&self, reading: &Reading) -> Assessment {
        Assessment {
            current: Status::assess(reading.current, self.current),
            temperature: Status::assess(reading.temperature, self.temperature),
            vibration: Status::assess(reading.vibration, self.vibration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_below_threshold_is_ok() {
        assert_eq!(Status::assess(9.99, 10.0), Status::Ok);
        assert_eq!(Status::assess(10.0, 10.0), Status::NotOk);
        assert_eq!(Status::assess(10.01, 10.0), Status::NotOk);
        assert_eq!(Status::assess(f64::NAN, 10.0), Status::NotOk);
    }

    #[test]
    fn quantities_are_assessed_independently() {
        let thresholds = Thresholds {
            current: 10.0,
            temperature: 80.0,
            vibration: 5.0,
        };
        let reading = Reading {
            current: 9.0,
            temperature: 85.0,
            vibration: 5.0,
        };

        assert_eq!(
            thresholds.assess(&reading),
            Assessment {
                current: Status::Ok,
                temperature: Status::NotOk,
                vibration: Status::NotOk,
            }
        );
    }

    #[test]
    fn labels_match_stored_text() {
        assert_eq!(Status::Ok.to_string(), "OK");
        assert_eq!(Status::NotOk.to_string(), "NOT OK");
        assert_eq!("NOT OK".parse::<Status>(), Ok(Status::NotOk));
        assert!("ok".parse::<Status>().is_err());
    }
}
