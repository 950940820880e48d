use super::{Payment, RegistrationData, SignUpCommand};

/// Collects registration fields across the sign-up steps. Payment details are only
/// stored once checkout completes and are dropped again by `clear_sensitive`.
#[derive(Debug, Clone, Default)]
pub struct RegistrationFlow {
    data: RegistrationData,
}

impl RegistrationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user_data(&mut self, email: &str, password: &str, role: &str) {
        self.data.email = email.to_string();
        self.data.password = password.to_string();
        self.data.role = role.to_string();
    }

    pub fn set_admin_data(&mut self, first_name: &str, last_name: &str) {
        self.data.admin_first_name = first_name.to_string();
        self.data.admin_last_name = last_name.to_string();
    }

    pub fn set_institution_data(&mut self, name: &str, kind: Option<&str>) {
        self.data.institution_name = name.to_string();
        self.data.institution_type = kind.filter(|k| !k.is_empty()).map(str::to_string);
    }

    pub fn set_plan_type(&mut self, plan_type: &str) {
        self.data.plan_type = plan_type.to_string();
    }

    pub fn set_user_names(&mut self, first_name: &str, last_name: &str) {
        self.data.user_first_name = first_name.to_string();
        self.data.user_last_name = last_name.to_string();
    }

    pub fn set_payment_info(&mut self, payment: Option<Payment>) {
        self.data.payment = payment;
    }

    pub fn clear(&mut self) {
        self.data = RegistrationData::default();
    }

    /// Password and payment only.
    pub fn clear_sensitive(&mut self) {
        self.data.password.clear();
        self.data.payment = None;
    }

    pub fn clear_except_plan(&mut self) {
        let plan = std::mem::take(&mut self.data.plan_type);
        self.clear();
        self.data.plan_type = plan;
    }

    pub fn to_data(&self) -> RegistrationData {
        self.data.clone()
    }

    pub fn to_command(&self) -> SignUpCommand {
        SignUpCommand::from_registration_flow(&self.data.to_value())
    }

    pub fn is_complete(&self, require_payment_confirmation: bool) -> bool {
        self.to_command().is_complete(require_payment_confirmation)
    }

    pub fn has_plan(&self) -> bool {
        !self.data.plan_type.is_empty()
    }

    pub fn data(&self) -> &RegistrationData {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlanType, Role};

    fn populated() -> RegistrationFlow {
        let mut flow = RegistrationFlow::new();
        flow.set_user_data("lucia@home.pe", "secret123", "relative");
        flow.set_admin_data("Rosa", "Diaz");
        flow.set_institution_data("Clinica Sol", Some("clinic"));
        flow.set_plan_type("premium");
        flow.set_user_names("Lucia", "Quispe");
        flow.set_payment_info(Some(Payment {
            provider: "stripe".into(),
            receipt_id: "rcpt_1".into(),
            confirmed: true,
        }));
        flow
    }

    #[test]
    fn to_command_round_trips_every_field() {
        let flow = populated();
        let data = flow.to_data();
        let cmd = SignUpCommand::from_registration_flow(&data.to_value());
        assert_eq!(cmd, flow.to_command());
        assert_eq!(cmd.role, Some(Role::Relative));
        assert_eq!(cmd.plan_type, Some(PlanType::Premium));
        assert_eq!(cmd.to_data(), data);

        let mut padded = populated();
        padded.set_admin_data(" Rosa", "Diaz ");
        padded.set_institution_data("Clinica  Sol ", Some(" clinic"));
        padded.set_user_names("Lucia ", "  Quispe");
        let data = padded.to_data();
        let cmd = SignUpCommand::from_registration_flow(&data.to_value());
        assert_eq!(cmd.admin_first_name, " Rosa");
        assert_eq!(cmd.institution_name, "Clinica  Sol ");
        assert_eq!(cmd, padded.to_command());
        assert_eq!(cmd.to_data(), data);
    }

    #[test]
    fn defaulted_fields_stay_defaulted() {
        let mut flow = RegistrationFlow::new();
        flow.set_user_data("a@b.co", "secret123", "doctor");
        let cmd = flow.to_command();
        assert_eq!(cmd.institution_type, None);
        assert_eq!(cmd.plan_type, None);
        assert_eq!(cmd.payment, None);
        assert_eq!(cmd.to_data(), flow.to_data());
    }

    #[test]
    fn clearing_rules() {
        let mut flow = populated();
        flow.clear_sensitive();
        assert!(flow.data().password.is_empty());
        assert!(flow.data().payment.is_none());
        assert_eq!(flow.data().email, "lucia@home.pe");

        flow.clear_except_plan();
        assert!(flow.has_plan());
        assert!(flow.data().email.is_empty());

        flow.clear();
        assert!(!flow.has_plan());
        assert_eq!(flow.to_data(), RegistrationData::default());
    }

    #[test]
    fn completeness_follows_role() {
        let mut flow = RegistrationFlow::new();
        flow.set_user_data("rosa@clinic.pe", "secret123", "admin");
        assert!(!flow.is_complete(false));
        flow.set_admin_data("Rosa", "Diaz");
        flow.set_institution_data("Clinica Sol", Some("clinic"));
        assert!(flow.is_complete(false));
    }
}
