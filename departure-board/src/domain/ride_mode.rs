//! Transport mode of a ride.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// How a ride is operated.
///
/// The backend sends this as a free-form string. Values we don't know yet
/// are kept verbatim in [`RideMode::Unknown`] so that a new mode on the
/// server never breaks decoding, and re-encoding yields the original text.
///
/// ```
/// use departure_board::domain::RideMode;
///
/// assert_eq!("BUS".parse::<RideMode>().unwrap(), RideMode::Bus);
/// let ferry: RideMode = "FERRY".parse().unwrap();
/// assert_eq!(ferry, RideMode::Unknown("FERRY".into()));
/// assert_eq!(ferry.as_str(), "FERRY");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RideMode {
    Bus,
    Airplane,
    LimitedExpress,
    /// A mode this build doesn't recognise, including the empty string.
    Unknown(String),
}

impl RideMode {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            RideMode::Bus => "BUS",
            RideMode::Airplane => "AIRPLANE",
            RideMode::LimitedExpress => "LIMITED_EXPRESS",
            RideMode::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, RideMode::Unknown(_))
    }
}

impl From<&str> for RideMode {
    fn from(s: &str) -> Self {
        match s {
            "BUS" => RideMode::Bus,
            "AIRPLANE" => RideMode::Airplane,
            "LIMITED_EXPRESS" => RideMode::LimitedExpress,
            other => RideMode::Unknown(other.to_string()),
        }
    }
}

impl From<String> for RideMode {
    fn from(s: String) -> Self {
        match RideMode::from(s.as_str()) {
            RideMode::Unknown(_) => RideMode::Unknown(s),
            known => known,
        }
    }
}

impl From<RideMode> for String {
    fn from(mode: RideMode) -> Self {
        match mode {
            RideMode::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for RideMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RideMode::from(s))
    }
}

impl fmt::Display for RideMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
