use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Account role. `User` is the generic placeholder the auth endpoint returns when it
/// does not know (or does not say) the specific role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    Doctor,
    Caregiver,
    Relative,
    #[default]
    User,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Doctor,
        Role::Caregiver,
        Role::Relative,
        Role::User,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Caregiver => "caregiver",
            Role::Relative => "relative",
            Role::User => "user",
        }
    }

    /// Case-insensitive; accepts a `ROLE_` prefix as some backends emit it.
    pub fn parse(s: &str) -> Option<Role> {
        let s = s.trim();
        let s = s
            .get(..5)
            .filter(|p| p.eq_ignore_ascii_case("role_"))
            .map_or(s, |_| &s[5..]);
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
    }

    /// True for every role except the generic placeholder.
    pub fn is_specific(self) -> bool {
        self != Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Unknown or null roles read as `User`.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Role::parse).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_variants() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" Doctor "), Some(Role::Doctor));
        assert_eq!(Role::parse("ROLE_CAREGIVER"), Some(Role::Caregiver));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn serde_is_lenient() {
        let r: Role = serde_json::from_str("\"relative\"").unwrap();
        assert_eq!(r, Role::Relative);
        let r: Role = serde_json::from_str("null").unwrap();
        assert_eq!(r, Role::User);
        let r: Role = serde_json::from_str("\"janitor\"").unwrap();
        assert_eq!(r, Role::User);
        assert_eq!(serde_json::to_string(&Role::Caregiver).unwrap(), "\"caregiver\"");
    }

    #[test]
    fn only_user_is_generic() {
        assert!(!Role::User.is_specific());
        assert!(Role::Admin.is_specific());
    }
}
