//! Doctors on leave, for story images
//!
//! Joins leave records against the roster to pick up each doctor's
//! specialization and photo. Names on the leave sheet are free text, so the
//! join goes through a slug that drops honorifics and specialist titles.

use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::roster::SpecializationGroup;
use crate::upstream::LeaveRecord;

/// Photo shown when the roster has none for a doctor
pub const PLACEHOLDER_PHOTO: &str = "https://placehold.co/200x200/e2e8f0/475569?text=No+Photo";

/// Specialization shown when the doctor is missing from the roster
pub const UNKNOWN_SPECIALIZATION: &str = "N/A";

static HONORIFIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(dr|drg)\b\.?\s*").expect("valid honorific pattern"));
static SPECIALIST_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(sp|m|subsp)\.[a-z]+\b").expect("valid specialist title pattern")
});
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,()]").expect("valid punctuation pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// A doctor currently on leave, ready for a story card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorOnLeave {
    /// `doc-<n>`, where n is the record's position on the leave sheet
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub photo_url: String,
    pub leave_start: Option<NaiveDate>,
    pub leave_end: NaiveDate,
}

/// Normalise a doctor name for matching across sheets
///
/// `"dr. Ayu Lestari, Sp.A"` and `"Ayu Lestari"` both become `"ayu-lestari"`.
pub fn doctor_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = HONORIFIC.replace_all(&lowered, "");
    let stripped = SPECIALIST_TITLE.replace_all(&stripped, "");
    let stripped = PUNCTUATION.replace_all(&stripped, "");
    WHITESPACE.replace_all(stripped.trim(), "-").into_owned()
}

/// Parse a `dd-mm-yyyy` sheet date
pub fn parse_sheet_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d-%m-%Y").ok()
}

struct RosterEntry<'a> {
    name: &'a str,
    specialization: &'a str,
    photo_url: Option<&'a str>,
}

/// Doctors whose leave has not ended before `today`, sorted by name then
/// leave start
pub fn doctors_on_leave(
    roster: &[SpecializationGroup],
    leaves: Vec<LeaveRecord>,
    today: NaiveDate,
) -> Vec<DoctorOnLeave> {
    let mut by_slug: HashMap<String, RosterEntry<'_>> = HashMap::new();
    for group in roster {
        for doctor in &group.doctors {
            by_slug
                .entry(doctor_slug(&doctor.name))
                .or_insert(RosterEntry {
                    name: &doctor.name,
                    specialization: &group.title,
                    photo_url: doctor.image_url.as_deref(),
                });
        }
    }

    let mut on_leave: Vec<DoctorOnLeave> = leaves
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let sheet_name = record.doctor_name.filter(|n| !n.trim().is_empty())?;
            let leave_end = record.ends_on.as_deref().and_then(parse_sheet_date)?;
            if leave_end < today {
                return None;
            }
            let leave_start = record.starts_on.as_deref().and_then(parse_sheet_date);
            let entry = by_slug.get(&doctor_slug(&sheet_name));

            Some(DoctorOnLeave {
                id: format!("doc-{index}"),
                name: entry.map_or(sheet_name.clone(), |e| e.name.to_string()),
                specialization: entry
                    .map_or(UNKNOWN_SPECIALIZATION, |e| e.specialization)
                    .to_string(),
                photo_url: entry
                    .and_then(|e| e.photo_url)
                    .unwrap_or(PLACEHOLDER_PHOTO)
                    .to_string(),
                leave_start,
                leave_end,
            })
        })
        .collect();

    on_leave.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.leave_start.cmp(&b.leave_start))
    });
    on_leave
}

/// Pick doctors by id, in the order the ids were given; unknown ids are
/// skipped
pub fn select_by_ids(doctors: &[DoctorOnLeave], ids: &[&str]) -> Vec<DoctorOnLeave> {
    ids.iter()
        .filter_map(|id| doctors.iter().find(|d| d.id == id.trim()))
        .cloned()
        .collect()
}
