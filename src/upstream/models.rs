//! Upstream payload shapes
//!
//! The roster endpoint returns an object keyed by specialization id. The
//! leave endpoint returns a flat array using the spreadsheet's column names.

use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::roster::{Doctor, Schedule, SpecializationGroup};

/// Roster payload, groups kept in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterPayload(pub Vec<SpecializationGroup>);

#[derive(Deserialize)]
struct RawGroup {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    doctors: Option<Vec<Option<RawDoctor>>>,
}

#[derive(Deserialize)]
struct RawDoctor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    schedule: Option<Schedule>,
    #[serde(default)]
    image_url: Option<String>,
}

impl RawGroup {
    fn into_group(self, id: String) -> SpecializationGroup {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(id);
        let doctors = self
            .doctors
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(RawDoctor::into_doctor)
            .collect();
        SpecializationGroup::new(title, doctors)
    }
}

impl RawDoctor {
    /// Rows without a name are sheet noise
    fn into_doctor(self) -> Option<Doctor> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        Some(Doctor {
            name,
            schedule: self.schedule.unwrap_or_default(),
            image_url: self.image_url.filter(|u| !u.trim().is_empty()),
        })
    }
}

impl<'de> Deserialize<'de> for RosterPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RosterVisitor;

        impl<'de> Visitor<'de> for RosterVisitor {
            type Value = RosterPayload;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object keyed by specialization id")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut groups = Vec::new();
                while let Some((id, raw)) = map.next_entry::<String, Option<RawGroup>>()? {
                    if let Some(raw) = raw {
                        groups.push(raw.into_group(id));
                    }
                }
                Ok(RosterPayload(groups))
            }
        }

        deserializer.deserialize_map(RosterVisitor)
    }
}

/// One row of the leave sheet; dates are `dd-mm-yyyy`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaveRecord {
    #[serde(rename = "NamaDokter", default)]
    pub doctor_name: Option<String>,
    #[serde(rename = "TanggalMulaiCuti", default)]
    pub starts_on: Option<String>,
    #[serde(rename = "TanggalSelesaiCuti", default)]
    pub ends_on: Option<String>,
}
