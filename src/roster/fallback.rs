//! Built-in roster used when neither the cache nor the upstream can serve one
//!
//! This is the only copy of the fallback data; tests compare against it
//! rather than re-declaring their own.

use once_cell::sync::Lazy;

use super::model::{Day, Doctor, Schedule, SpecializationGroup};

type FallbackDoctor = (&'static str, &'static [(Day, &'static str)]);

const FALLBACK: &[(&str, &[FallbackDoctor])] = &[
    (
        "Anak",
        &[
            (
                "dr. Ayu Lestari, Sp.A",
                &[(Day::Senin, "08:00 - 12:00"), (Day::Rabu, "08:00 - 12:00"), (Day::Jumat, "13:00 - 16:00")],
            ),
            (
                "dr. Hendra Wijaya, Sp.A",
                &[(Day::Selasa, "16:00 - 19:00"), (Day::Kamis, "16:00 - 19:00")],
            ),
        ],
    ),
    (
        "Penyakit Dalam",
        &[
            (
                "dr. Bambang Prasetyo, Sp.PD",
                &[(Day::Senin, "09:00 - 13:00"), (Day::Selasa, "09:00 - 13:00"), (Day::Sabtu, "08:00 - 11:00")],
            ),
            (
                "dr. Sari Dewi, Sp.PD",
                &[(Day::Rabu, "14:00 - 17:00"), (Day::Jumat, "14:00 - 17:00")],
            ),
        ],
    ),
    (
        "Obstetri & Ginekologi",
        &[(
            "dr. Maya Anggraini, Sp.OG",
            &[(Day::Senin, "10:00 - 14:00"), (Day::Kamis, "10:00 - 14:00")],
        )],
    ),
    (
        "Bedah",
        &[(
            "dr. Agus Salim, Sp.B",
            &[(Day::Selasa, "08:00 - 11:00"), (Day::Jumat, "08:00 - 11:00")],
        )],
    ),
    (
        "Jantung & Pembuluh Darah",
        &[(
            "dr. Rudi Hartono, Sp.JP",
            &[(Day::Rabu, "09:00 - 12:00"), (Day::Sabtu, "09:00 - 12:00")],
        )],
    ),
    (
        "Saraf",
        &[(
            "dr. Lina Marlina, Sp.N",
            &[(Day::Senin, "15:00 - 18:00"), (Day::Kamis, "15:00 - 18:00")],
        )],
    ),
    (
        "Urologi",
        &[("dr. Yusuf Hakim, Sp.U", &[(Day::Selasa, "13:00 - 16:00")])],
    ),
    (
        "Kulit & Kelamin",
        &[(
            "dr. Nadia Putri, Sp.KK",
            &[(Day::Rabu, "16:00 - 19:00"), (Day::Sabtu, "10:00 - 13:00")],
        )],
    ),
];

static FALLBACK_ROSTER: Lazy<Vec<SpecializationGroup>> = Lazy::new(|| {
    FALLBACK
        .iter()
        .map(|(title, doctors)| {
            let doctors = doctors
                .iter()
                .map(|(name, slots)| Doctor::new(*name, Schedule::from_slots(slots.iter().copied())))
                .collect();
            SpecializationGroup::new(*title, doctors)
        })
        .collect()
});

/// A fresh copy of the built-in roster
pub fn fallback_roster() -> Vec<SpecializationGroup> {
    FALLBACK_ROSTER.clone()
}
