//! Resource assemblers: raw API JSON to typed entities.
//!
//! The backend is not consistent about shapes. Collections arrive either as a
//! bare array or wrapped in an object under a plural key, fields are sometimes
//! `null` instead of absent, and a few resources use alternate key names. The
//! assemblers absorb that so the rest of the crate only sees `model` types.

mod auth;
mod devices;
mod organization;
mod relatives;

pub use auth::{sign_in_resource, sign_up_resource, user, users, SignInResource, SignUpResource};
pub use devices::{alert, alerts, device, devices, measurement_series};
pub use organization::{
    admin, admins, caregiver, caregivers, doctor, doctors, organization, organizations,
    senior_citizen, senior_citizens,
};
pub use relatives::{relative, relatives};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Drop `null` members recursively so `#[serde(default)]` fills them in.
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

/// Items of a collection response: either the body itself or the array under `key`.
pub fn collection<'a>(body: &'a Value, key: &str) -> Result<&'a [Value], ApiError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(map) => match map.get(key) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ApiError::network(format!(
                "expected an array or an object with a `{key}` array"
            ))),
        },
        _ => Err(ApiError::network(format!("expected a `{key}` collection"))),
    }
}

/// Deserialize one resource after stripping nulls.
pub fn entity<T: DeserializeOwned>(resource: &Value) -> Result<T, ApiError> {
    if !resource.is_object() {
        return Err(ApiError::network("expected a JSON object resource"));
    }
    Ok(serde_json::from_value(strip_nulls(resource.clone()))?)
}

/// Body for a create/update request: the entity's JSON without nulls, and without
/// an `id` member when `drop_id` is set (new resources get their id from the server).
pub fn to_resource<T: Serialize>(entity: &T, drop_id: bool) -> Result<Value, ApiError> {
    let mut value = strip_nulls(serde_json::to_value(entity)?);
    if drop_id {
        if let Value::Object(map) = &mut value {
            map.remove("id");
        }
    }
    Ok(value)
}

/// Follow a dotted path (`"plan.type"`) through nested objects.
pub(crate) fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |v, key| v.as_object()?.get(key))
        .filter(|v| !v.is_null())
}

/// First non-empty string among `paths`.
pub(crate) fn first_str(value: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .filter_map(|p| lookup(value, p)?.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First integer among `paths`. Numeric strings count (some ids come back quoted).
pub(crate) fn first_i64(value: &Value, paths: &[&str]) -> Option<i64> {
    paths.iter().filter_map(|p| lookup(value, p)).find_map(as_i64)
}

pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Copy of `resource` as an object map with nulls stripped (empty map for non-objects).
pub(crate) fn object(resource: &Value) -> Map<String, Value> {
    match strip_nulls(resource.clone()) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
