use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use super::PlanType;

/// Vital-sign series attached to a senior citizen resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignalVitals {
    /// `[diastolic, systolic]` pairs.
    pub blood_pressure: Vec<[f64; 2]>,
    pub heart_rate: Vec<f64>,
    pub temperature: Vec<f64>,
    pub oxygen_level: Vec<f64>,
}

/// Alert summary embedded in a senior citizen resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeniorAlert {
    pub id: Option<i64>,
    pub alert_title: String,
    pub date: String,
    pub time: String,
    pub data_registered: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeniorCitizen {
    pub id: i64,
    /// Owning tenant. 0 means "unknown" and is never visible through a scoped view.
    pub organization_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "lenient_date")]
    pub birth_date: Option<NaiveDate>,
    pub age: u32,
    pub gender: String,
    pub weight: f64,
    pub dni: String,
    pub height: f64,
    pub image_url: String,
    pub device_id: i64,
    pub assigned_doctor_id: Option<i64>,
    pub assigned_caregiver_id: Option<i64>,
    pub plan_type: PlanType,
    pub signal_vitals: Option<SignalVitals>,
    pub alerts: Vec<SeniorAlert>,
}

/// Accepts `YYYY-MM-DD` or anything starting with it (ISO timestamps); otherwise None.
fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let day = s.trim().get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }))
}

/// Whole years between `birth` and `today`.
pub(crate) fn years_between(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

impl SeniorCitizen {
    pub fn full_name(&self) -> String {
        super::join_name(&self.first_name, &self.last_name)
    }

    /// Fill whichever of `age` / `birth_date` is missing from the other (nothing when both are unknown).
    pub fn reconcile_age(&mut self, today: NaiveDate) {
        match self.birth_date {
            Some(birth) if self.age == 0 => self.age = years_between(birth, today),
            Some(_) => {}
            None if self.age > 0 => self.birth_date = birth_date_for_age(self.age, today),
            None => {}
        }
    }

    pub fn set_birth_date(&mut self, birth: NaiveDate, today: NaiveDate) {
        self.birth_date = Some(birth);
        self.age = years_between(birth, today);
    }

    pub fn set_age(&mut self, age: u32, today: NaiveDate) {
        self.age = age;
        self.birth_date = birth_date_for_age(age, today);
    }

    pub fn is_assigned_to(&self, person_id: i64) -> bool {
        self.assigned_doctor_id == Some(person_id) || self.assigned_caregiver_id == Some(person_id)
    }

    pub fn is_assigned_to_doctor(&self, doctor_id: i64) -> bool {
        self.assigned_doctor_id == Some(doctor_id)
    }

    pub fn is_assigned_to_caregiver(&self, caregiver_id: i64) -> bool {
        self.assigned_caregiver_id == Some(caregiver_id)
    }

    pub fn has_doctor(&self) -> bool {
        self.assigned_doctor_id.is_some()
    }

    pub fn has_caregiver(&self) -> bool {
        self.assigned_caregiver_id.is_some()
    }
}

/// Same calendar day `age` years back; Feb 29 falls back to Feb 28.
fn birth_date_for_age(age: u32, today: NaiveDate) -> Option<NaiveDate> {
    let year = today.year() - age as i32;
    NaiveDate::from_ymd_opt(year, today.month(), today.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
}
