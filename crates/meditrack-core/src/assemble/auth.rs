use serde_json::Value;

use super::{collection, entity, first_i64, first_str, object};
use crate::error::ApiError;
use crate::model::{CurrentUser, PlanType, Role, User};

/// What the sign-in endpoint hands back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignInResource {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub token: Option<String>,
    /// None when the backend omitted the role entirely.
    pub role: Option<Role>,
    pub organization_id: Option<i64>,
    pub entity_id: Option<i64>,
}

impl SignInResource {
    /// Role is missing or only the generic `user` placeholder.
    pub fn needs_role_lookup(&self) -> bool {
        !self.role.is_some_and(Role::is_specific)
    }

    pub fn to_current_user(&self) -> CurrentUser {
        CurrentUser {
            id: self.id,
            email: self.email.clone(),
            role: self.role.unwrap_or_default(),
            organization_id: self.organization_id,
            entity_id: self.entity_id,
            token: self.token.clone(),
        }
    }
}

/// What the sign-up endpoint hands back, after unwrapping `user` / `signUp` envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignUpResource {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub token: Option<String>,
    pub organization_id: Option<i64>,
    pub entity_id: Option<i64>,
    pub admin_first_name: Option<String>,
    pub admin_last_name: Option<String>,
    pub institution_name: Option<String>,
    pub institution_type: Option<String>,
    pub plan_type: Option<PlanType>,
}

impl SignUpResource {
    pub fn needs_role_lookup(&self) -> bool {
        !self.role.is_some_and(Role::is_specific)
    }

    pub fn to_current_user(&self) -> CurrentUser {
        CurrentUser {
            id: self.id,
            email: self.email.clone(),
            role: self.role.unwrap_or_default(),
            organization_id: self.organization_id,
            entity_id: self.entity_id,
            token: self.token.clone(),
        }
    }
}

fn role_at(value: &Value, paths: &[&str]) -> Option<Role> {
    first_str(value, paths).and_then(|r| Role::parse(&r))
}

/// Sign-in response body. Anything other than a JSON object means there is no resource.
pub fn sign_in_resource(body: &Value) -> Result<SignInResource, ApiError> {
    if !body.is_object() {
        return Err(ApiError::Authentication("invalid sign in response".to_string()));
    }
    Ok(SignInResource {
        id: first_i64(body, &["id"]),
        email: first_str(body, &["email", "username"]),
        token: first_str(body, &["token"]),
        role: role_at(body, &["role"]),
        organization_id: first_i64(body, &["organizationId"]),
        entity_id: first_i64(body, &["entityId"]),
    })
}

/// Sign-up response body. The payload may sit under `user` or `signUp`.
pub fn sign_up_resource(body: &Value) -> Result<SignUpResource, ApiError> {
    if !body.is_object() {
        return Err(ApiError::Authentication("invalid sign up response".to_string()));
    }
    let payload = ["user", "signUp"]
        .iter()
        .filter_map(|k| body.get(*k))
        .find(|v| v.is_object())
        .unwrap_or(body);

    Ok(SignUpResource {
        id: first_i64(payload, &["id", "userId", "_id"]),
        email: first_str(payload, &["username", "email", "user.email"]),
        first_name: first_str(payload, &["firstName", "name", "user.firstName"]),
        last_name: first_str(payload, &["lastName", "user.lastName"]),
        role: role_at(payload, &["role", "user.role"]),
        token: first_str(payload, &["token", "accessToken", "authToken"]),
        organization_id: first_i64(payload, &["organizationId", "organization.id", "organization"]),
        entity_id: first_i64(payload, &["entityId"]),
        admin_first_name: first_str(
            payload,
            &["adminFirstName", "admin.firstName", "user.adminFirstName"],
        ),
        admin_last_name: first_str(
            payload,
            &["adminLastName", "admin.lastName", "user.adminLastName"],
        ),
        institution_name: first_str(
            payload,
            &["institutionName", "institution.name", "organization.name"],
        ),
        institution_type: first_str(
            payload,
            &["institutionType", "institution.type", "organization.type"],
        ),
        plan_type: first_str(payload, &["PlanType", "planType", "plan.type", "plan"])
            .and_then(|p| PlanType::parse(&p)),
    })
}

/// One user-directory entry; `username` stands in for a missing `email`.
pub fn user(resource: &Value) -> Result<User, ApiError> {
    let mut map = object(resource);
    if !map.contains_key("email") {
        if let Some(name) = map.remove("username") {
            map.insert("email".to_string(), name);
        }
    }
    entity(&Value::Object(map))
}

pub fn users(body: &Value) -> Result<Vec<User>, ApiError> {
    collection(body, "users")?.iter().map(user).collect()
}
