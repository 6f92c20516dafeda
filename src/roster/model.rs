//! Roster data model
//!
//! Doctors, their weekly schedules, and the specialization groups they are
//! listed under. The same shapes are used for the upstream payload, the cache
//! snapshot, and the renderer output.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{
    de::{self, IgnoredAny, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};

/// Day of the week, keyed the way the upstream spreadsheet keys them
///
/// Variant order is display order (Senin first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Senin,
    Selasa,
    Rabu,
    Kamis,
    Jumat,
    Sabtu,
    Minggu,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Senin,
        Day::Selasa,
        Day::Rabu,
        Day::Kamis,
        Day::Jumat,
        Day::Sabtu,
        Day::Minggu,
    ];

    /// Key used in JSON payloads
    pub fn key(&self) -> &'static str {
        match self {
            Day::Senin => "senin",
            Day::Selasa => "selasa",
            Day::Rabu => "rabu",
            Day::Kamis => "kamis",
            Day::Jumat => "jumat",
            Day::Sabtu => "sabtu",
            Day::Minggu => "minggu",
        }
    }
}

impl FromStr for Day {
    type Err = UnknownDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| day.key() == key)
            .ok_or_else(|| UnknownDay(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day key: {0}")]
pub struct UnknownDay(pub String);

/// Weekly practice schedule for one doctor
///
/// Blank and `"-"` slots are treated as absent and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schedule(BTreeMap<Day, String>);

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schedule from `(day, time range)` pairs
    pub fn from_slots<'a>(slots: impl IntoIterator<Item = (Day, &'a str)>) -> Self {
        let mut schedule = Self::new();
        for (day, slot) in slots {
            schedule.insert(day, slot);
        }
        schedule
    }

    /// Insert a slot, ignoring blank or `"-"` values
    pub fn insert(&mut self, day: Day, slot: impl AsRef<str>) {
        let slot = slot.as_ref().trim();
        if slot.is_empty() || slot == "-" {
            return;
        }
        self.0.insert(day, slot.to_string());
    }

    pub fn get(&self, day: Day) -> Option<&str> {
        self.0.get(&day).map(String::as_str)
    }

    /// Slots in day order
    pub fn iter(&self) -> impl Iterator<Item = (Day, &str)> {
        self.0.iter().map(|(day, slot)| (*day, slot.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A schedule slot as it may appear on the wire
///
/// Older sheets wrap the time range in `{ "jam": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSlot {
    Text(String),
    Legacy { jam: Option<String> },
    Other(IgnoredAny),
}

impl RawSlot {
    fn into_text(self) -> Option<String> {
        match self {
            RawSlot::Text(text) => Some(text),
            RawSlot::Legacy { jam } => jam,
            RawSlot::Other(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScheduleVisitor;

        impl<'de> Visitor<'de> for ScheduleVisitor {
            type Value = Schedule;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of day keys to time ranges")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut schedule = Schedule::new();
                while let Some((key, slot)) = map.next_entry::<String, RawSlot>()? {
                    // Sheets occasionally carry extra columns; skip them.
                    let Ok(day) = key.parse::<Day>() else {
                        continue;
                    };
                    if let Some(text) = slot.into_text() {
                        schedule.insert(day, text);
                    }
                }
                Ok(schedule)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Schedule::new())
            }
        }

        deserializer.deserialize_any(ScheduleVisitor)
    }
}

/// A doctor listed on the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub name: String,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Doctor {
    pub fn new(name: impl Into<String>, schedule: Schedule) -> Self {
        Self {
            name: name.into(),
            schedule,
            image_url: None,
        }
    }
}

/// Doctors practicing under one specialization title
///
/// `continued` is set on the second fragment of a group that was split across
/// two brochure columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecializationGroup {
    pub title: String,
    pub doctors: Vec<Doctor>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub continued: bool,
}

impl SpecializationGroup {
    pub fn new(title: impl Into<String>, doctors: Vec<Doctor>) -> Self {
        Self {
            title: title.into(),
            doctors,
            continued: false,
        }
    }

    pub fn doctor_count(&self) -> usize {
        self.doctors.len()
    }
}

/// Total number of doctors across a set of groups
pub fn total_doctors(groups: &[SpecializationGroup]) -> usize {
    groups.iter().map(SpecializationGroup::doctor_count).sum()
}
