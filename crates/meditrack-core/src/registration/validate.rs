//! Role-conditional validation of a `SignUpCommand`.
//!
//! Base rules (email, password, role) run for every command; then the rule for the
//! command's role is looked up in `ROLE_RULES`. Every failure is reported, in order.

use super::SignUpCommand;
use crate::error::ApiError;
use crate::model::{PlanType, Role};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Result of `SignUpCommand::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.valid {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

/// `local@domain.tld` shape: no whitespace, something before the `@`, and a dot
/// after it with something on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let last_inner_dot = email
        .char_indices()
        .filter(|&(i, c)| c == '.' && i + 1 < email.len())
        .map(|(i, _)| i)
        .last();
    // Any '@' past the first byte may split the address; the earliest is checked.
    let first_at = email.char_indices().skip(1).find(|&(_, c)| c == '@').map(|(i, _)| i);
    let (Some(at), Some(dot)) = (first_at, last_inner_dot) else {
        return false;
    };
    dot >= at + 2
}

struct Rules {
    require_payment_confirmation: bool,
}

type RoleRule = fn(&SignUpCommand, &Rules, &mut Vec<String>);

const ROLE_RULES: &[(Role, RoleRule)] = &[(Role::Admin, admin_rule), (Role::Relative, relative_rule)];

fn admin_rule(cmd: &SignUpCommand, _: &Rules, errors: &mut Vec<String>) {
    let required = [
        ("adminFirstName", cmd.admin_first_name.as_str()),
        ("adminLastName", cmd.admin_last_name.as_str()),
        ("institutionName", cmd.institution_name.as_str()),
        ("institutionType", cmd.institution_type.as_deref().unwrap_or_default()),
    ];
    for (field, value) in required {
        if value.is_empty() {
            errors.push(format!("{field} is required for admin role"));
        }
    }
}

fn relative_rule(cmd: &SignUpCommand, rules: &Rules, errors: &mut Vec<String>) {
    if cmd.plan_type != Some(PlanType::Premium) || !rules.require_payment_confirmation {
        return;
    }
    match &cmd.payment {
        None => errors.push("payment is required for premium plan".to_string()),
        Some(p) if !p.confirmed => {
            errors.push("payment must be confirmed for premium plan".to_string())
        }
        Some(_) => {}
    }
}

fn role_rule(role: Role) -> Option<RoleRule> {
    ROLE_RULES.iter().find(|(r, _)| *r == role).map(|(_, rule)| *rule)
}

impl SignUpCommand {
    /// Check every rule and report all failures at once.
    pub fn validate(&self, require_payment_confirmation: bool) -> ValidationOutcome {
        let mut errors = Vec::new();

        if self.email.is_empty() {
            errors.push("email is required".to_string());
        } else if !is_valid_email(&self.email) {
            errors.push("email is invalid".to_string());
        }

        if self.password.is_empty() {
            errors.push("password is required".to_string());
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!("password must be at least {MIN_PASSWORD_LEN} characters"));
        }

        match self.role {
            None => errors.push("role is required".to_string()),
            Some(role) => {
                if let Some(rule) = role_rule(role) {
                    let rules = Rules {
                        require_payment_confirmation,
                    };
                    rule(self, &rules, &mut errors);
                }
            }
        }

        ValidationOutcome::from_errors(errors)
    }

    /// Field presence only (no format checks); gates the flow's "continue" step.
    pub fn is_complete(&self, require_payment_confirmation: bool) -> bool {
        let base = !self.email.is_empty() && !self.password.is_empty();
        match self.role {
            Some(Role::Admin) => {
                base && !self.admin_first_name.is_empty()
                    && !self.admin_last_name.is_empty()
                    && !self.institution_name.is_empty()
                    && self.institution_type.as_deref().is_some_and(|t| !t.is_empty())
            }
            Some(Role::Relative) if self.is_premium() && require_payment_confirmation => {
                base && self.payment.as_ref().is_some_and(|p| p.confirmed)
            }
            _ => base,
        }
    }

    /// Complete and well-formed.
    pub fn is_valid(&self, require_payment_confirmation: bool) -> bool {
        self.is_complete(require_payment_confirmation) && self.validate(require_payment_confirmation).valid
    }
}

#[cfg(test)]
mod tests {
    use super::super::Payment;
    use super::*;

    fn relative(plan: Option<PlanType>, payment: Option<Payment>) -> SignUpCommand {
        SignUpCommand {
            email: "lucia@home.pe".into(),
            password: "secret123".into(),
            role: Some(Role::Relative),
            plan_type: plan,
            payment,
            ..Default::default()
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.pe"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("plainaddress"));
        assert!(is_valid_email("a@b.c."));
        assert!(is_valid_email("@a@b.co"));
        assert!(!is_valid_email("@a@.co"));
    }

    #[test]
    fn empty_command_reports_base_errors_in_order() {
        let outcome = SignUpCommand::default().validate(false);
        assert!(!outcome.valid);
        assert_eq!(
            outcome.errors,
            vec!["email is required", "password is required", "role is required"]
        );
    }

    #[test]
    fn format_errors() {
        let cmd = SignUpCommand {
            email: "not-an-email".into(),
            password: "short".into(),
            role: Some(Role::Doctor),
            ..Default::default()
        };
        assert_eq!(
            cmd.validate(false).errors,
            vec!["email is invalid", "password must be at least 8 characters"]
        );
    }

    #[test]
    fn admin_with_empty_fields_gets_four_role_errors() {
        let cmd = SignUpCommand {
            email: "rosa@clinic.pe".into(),
            password: "secret123".into(),
            role: Some(Role::Admin),
            ..Default::default()
        };
        let outcome = cmd.validate(false);
        assert!(!outcome.valid);
        assert_eq!(
            outcome.errors,
            vec![
                "adminFirstName is required for admin role",
                "adminLastName is required for admin role",
                "institutionName is required for admin role",
                "institutionType is required for admin role",
            ]
        );

        let mut bad_base = cmd.clone();
        bad_base.email.clear();
        let outcome = bad_base.validate(false);
        assert_eq!(outcome.errors.len(), 5);
        assert_eq!(outcome.errors[0], "email is required");
    }

    #[test]
    fn premium_relative_payment_rules() {
        let no_payment = relative(Some(PlanType::Premium), None);
        assert_eq!(
            no_payment.validate(true).errors,
            vec!["payment is required for premium plan"]
        );
        assert!(no_payment.validate(false).valid);

        let unconfirmed = relative(Some(PlanType::Premium), Some(Payment::default()));
        assert_eq!(
            unconfirmed.validate(true).errors,
            vec!["payment must be confirmed for premium plan"]
        );

        let confirmed = relative(
            Some(PlanType::Premium),
            Some(Payment {
                confirmed: true,
                ..Default::default()
            }),
        );
        assert!(confirmed.validate(true).valid);
        assert!(relative(Some(PlanType::Freemium), None).validate(true).valid);
    }

    #[test]
    fn completeness_is_presence_only() {
        let cmd = SignUpCommand {
            email: "not-an-email".into(),
            password: "x".into(),
            role: Some(Role::Caregiver),
            ..Default::default()
        };
        assert!(cmd.is_complete(false));
        assert!(!cmd.is_valid(false));

        let premium = relative(Some(PlanType::Premium), None);
        assert!(premium.is_complete(false));
        assert!(!premium.is_complete(true));
    }

    #[test]
    fn validation_error_carries_reasons() {
        let err = SignUpCommand::default().validate(false).into_result().unwrap_err();
        assert_eq!(err.validation_errors().len(), 3);
    }
}
