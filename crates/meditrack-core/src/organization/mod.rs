//! Organization-scoped state: the tenant's doctors, caregivers, senior citizens
//! and admins, the active `OrganizationContext`, and the role-scoped views
//! derived from them.

mod context;
mod filter;
mod store;

pub use context::OrganizationContext;
pub use filter::filter_senior_citizens;
pub use store::OrganizationStore;

use crate::model::{Admin, Caregiver, Doctor, SeniorCitizen};

/// Records that belong to exactly one tenant.
pub trait TenantScoped {
    fn organization_id(&self) -> i64;
}

macro_rules! tenant_scoped {
    ($($ty:ty),*) => {
        $(impl TenantScoped for $ty {
            fn organization_id(&self) -> i64 {
                self.organization_id
            }
        })*
    };
}

tenant_scoped!(Admin, Caregiver, Doctor, SeniorCitizen);
