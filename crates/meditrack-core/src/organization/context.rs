use crate::model::{CurrentUser, Role};

/// Who is looking at the organization's data: the tenant, the actor's role and the
/// id of the actor's role-specific record (doctor id, caregiver id, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizationContext {
    pub organization_id: i64,
    pub role: Role,
    pub entity_id: Option<i64>,
}

impl OrganizationContext {
    pub fn new(organization_id: i64, role: Role, entity_id: Option<i64>) -> Self {
        Self {
            organization_id,
            role,
            entity_id,
        }
    }

    /// Context straight from the session, when it already names the tenant.
    pub fn from_session(user: &CurrentUser) -> Option<Self> {
        let organization_id = user.organization_id.filter(|id| *id != 0)?;
        Some(Self::new(organization_id, user.role, user.entity_id))
    }

    /// A zero organization id never selects anything.
    pub fn has_tenant(&self) -> bool {
        self.organization_id != 0
    }
}
