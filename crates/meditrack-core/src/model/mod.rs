//! Domain entities.
//!
//! Plain data holders deserialized from API resources (camelCase) plus the small
//! amount of derived behaviour views rely on: full names, ages, plan tiers,
//! assignment checks.

mod admin;
mod caregiver;
mod device;
mod doctor;
mod organization;
mod relative;
mod role;
mod senior_citizen;
mod session;
mod user;

pub use admin::Admin;
pub use caregiver::Caregiver;
pub use device::{Alert, Device, MeasurementKind, MeasurementSeries, NewMeasurement};
pub use doctor::Doctor;
pub use organization::Organization;
pub use relative::{is_freemium, is_premium, PlanType, Relative};
pub use role::Role;
pub use senior_citizen::{SeniorAlert, SeniorCitizen, SignalVitals};
pub use session::CurrentUser;
pub use user::User;

/// `"first last"` with surrounding whitespace removed (either part may be empty).
pub fn join_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last).trim().to_string()
}

/// Split a display name at the first space: `"Ana María López"` -> (`"Ana"`, `"María López"`).
pub fn split_full_name(full: &str) -> (String, String) {
    let mut parts = full.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest: Vec<&str> = parts.collect();
    (first, rest.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_name_trims() {
        assert_eq!(join_name("Ana", "Lopez"), "Ana Lopez");
        assert_eq!(join_name("Ana", ""), "Ana");
        assert_eq!(join_name("", ""), "");
    }

    #[test]
    fn split_full_name_keeps_compound_last_name() {
        assert_eq!(
            split_full_name("  Ana María López "),
            ("Ana".to_string(), "María López".to_string())
        );
        assert_eq!(split_full_name("Plato"), ("Plato".to_string(), String::new()));
        assert_eq!(split_full_name(""), (String::new(), String::new()));
    }
}
