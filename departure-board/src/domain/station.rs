//! Station type.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A stop that rides depart from, call at, or terminate at.
///
/// Identity is the `id` alone: two stations with the same id compare equal
/// even if their names differ between snapshots. The id may be empty for
/// endpoints the backend has no timetable for (airports, for instance).
///
/// # Examples
///
/// ```
/// use departure_board::domain::Station;
///
/// let a = Station::new("HAKODATEBUS_050019", "Akagawa", "あかがわ");
/// let b = Station::new("HAKODATEBUS_050019", "Akagawa (renamed)", "");
/// assert_eq!(a, b);
/// assert!(!a.is_virtual());
/// assert!(Station::new("", "Haneda Airport", "").is_virtual());
/// ```
#[derive(Clone)]
pub struct Station {
    id: String,
    name: String,
    pronunciation: String,
}

impl Station {
    /// Create a station.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        pronunciation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pronunciation: pronunciation.into(),
        }
    }

    /// Backend identifier. Empty for virtual endpoints.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reading aid for the name (kana, romanization). May be empty.
    pub fn pronunciation(&self) -> &str {
        &self.pronunciation
    }

    /// True when the station has no backend id.
    pub fn is_virtual(&self) -> bool {
        self.id.is_empty()
    }

    /// Name followed by the pronunciation in parentheses, if there is one.
    pub fn display_name(&self) -> String {
        if self.pronunciation.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.pronunciation)
        }
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({:?}, {:?})", self.id, self.name)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
