use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::assemble::{first_str, lookup};
use crate::model::{PlanType, Role};

/// Payment confirmation from the checkout step, e.g. `{provider: "stripe", receiptId, confirmed}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payment {
    pub provider: String,
    pub receipt_id: String,
    pub confirmed: bool,
}

impl Payment {
    fn from_value(value: &Value) -> Option<Payment> {
        if !value.is_object() {
            return None;
        }
        Some(Payment {
            provider: first_str(value, &["provider"]).unwrap_or_default(),
            receipt_id: first_str(value, &["receiptId"]).unwrap_or_default(),
            // Only a literal `true` confirms.
            confirmed: value.get("confirmed") == Some(&Value::Bool(true)),
        })
    }

    fn to_value(&self) -> Value {
        json!({
            "provider": self.provider,
            "receiptId": self.receipt_id,
            "confirmed": self.confirmed,
        })
    }
}

/// Flat registration fields as the flow holder keeps them (strings, empty when unset).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationData {
    pub email: String,
    pub password: String,
    pub role: String,
    pub admin_first_name: String,
    pub admin_last_name: String,
    pub institution_name: String,
    /// `clinic` | `resident`
    pub institution_type: Option<String>,
    pub plan_type: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub payment: Option<Payment>,
}

impl RegistrationData {
    pub fn to_value(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password,
            "role": self.role,
            "adminFirstName": self.admin_first_name,
            "adminLastName": self.admin_last_name,
            "institutionName": self.institution_name,
            "institutionType": self.institution_type,
            "planType": self.plan_type,
            "userFirstName": self.user_first_name,
            "userLastName": self.user_last_name,
            "payment": self.payment.as_ref().map(Payment::to_value),
        })
    }
}

/// A registration ready for validation and submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignUpCommand {
    pub email: String,
    pub password: String,
    /// None when the flow never picked one (or picked something unknown).
    pub role: Option<Role>,
    pub admin_first_name: String,
    pub admin_last_name: String,
    pub institution_name: String,
    pub institution_type: Option<String>,
    pub plan_type: Option<PlanType>,
    pub user_first_name: String,
    pub user_last_name: String,
    pub payment: Option<Payment>,
}

/// First non-empty string among `paths`, kept verbatim.
fn raw_str(flow: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .filter_map(|p| lookup(flow, p)?.as_str())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn text(flow: &Value, paths: &[&str]) -> String {
    raw_str(flow, paths).unwrap_or_default()
}

impl SignUpCommand {
    /// Map raw registration-flow data to a command. Accepts the flat keys the flow
    /// holder produces as well as nested `admin.*`, `organization.*` and `user.*`
    /// variants. Pure; missing fields default to empty.
    pub fn from_registration_flow(flow: &Value) -> SignUpCommand {
        SignUpCommand {
            email: text(flow, &["email"]),
            password: text(flow, &["password"]),
            role: first_str(flow, &["role"]).and_then(|r| Role::parse(&r)),
            admin_first_name: text(flow, &["adminFirstName", "admin.firstName"]),
            admin_last_name: text(flow, &["adminLastName", "admin.lastName"]),
            institution_name: text(flow, &["institutionName", "organization.name"]),
            institution_type: raw_str(flow, &["institutionType", "organization.type"]),
            plan_type: first_str(flow, &["planType"]).and_then(|p| PlanType::parse(&p)),
            user_first_name: text(flow, &["userFirstName", "user.firstName"]),
            user_last_name: text(flow, &["userLastName", "user.lastName"]),
            payment: lookup(flow, "payment").and_then(Payment::from_value),
        }
    }

    /// Back to the flow holder's flat shape.
    pub fn to_data(&self) -> RegistrationData {
        RegistrationData {
            email: self.email.clone(),
            password: self.password.clone(),
            role: self.role.map(|r| r.as_str().to_string()).unwrap_or_default(),
            admin_first_name: self.admin_first_name.clone(),
            admin_last_name: self.admin_last_name.clone(),
            institution_name: self.institution_name.clone(),
            institution_type: self.institution_type.clone(),
            plan_type: self.plan_type.map(|p| p.as_str().to_string()).unwrap_or_default(),
            user_first_name: self.user_first_name.clone(),
            user_last_name: self.user_last_name.clone(),
            payment: self.payment.clone(),
        }
    }

    pub fn is_premium(&self) -> bool {
        self.plan_type == Some(PlanType::Premium)
    }

    /// Request body for the sign-up endpoint: `email, password, role`, plus
    /// `firstName, lastName, organizationName, organizationType` for admins and
    /// `planType` for relatives.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("email".into(), json!(self.email));
        payload.insert("password".into(), json!(self.password));
        payload.insert(
            "role".into(),
            json!(self.role.map(Role::as_str).unwrap_or_default()),
        );
        match self.role {
            Some(Role::Admin) => {
                payload.insert("firstName".into(), json!(self.admin_first_name));
                payload.insert("lastName".into(), json!(self.admin_last_name));
                payload.insert("organizationName".into(), json!(self.institution_name));
                payload.insert("organizationType".into(), json!(self.institution_type));
            }
            Some(Role::Relative) => {
                if let Some(plan) = self.plan_type {
                    payload.insert("planType".into(), json!(plan.as_str()));
                }
            }
            _ => {}
        }
        Value::Object(payload)
    }
}
