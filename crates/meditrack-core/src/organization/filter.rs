use super::OrganizationContext;
use crate::model::{Role, SeniorCitizen};

/// Senior citizens visible to the actor in `context`.
///
/// Tenant first: only seniors of the context's organization survive, whatever the
/// role. Then doctors see the seniors assigned to them, caregivers likewise, and
/// everyone else sees the whole tenant. No context, or organization id 0, gives
/// an empty result.
pub fn filter_senior_citizens(
    seniors: &[SeniorCitizen],
    context: Option<&OrganizationContext>,
) -> Vec<SeniorCitizen> {
    let Some(ctx) = context.filter(|c| c.has_tenant()) else {
        return Vec::new();
    };
    seniors
        .iter()
        .filter(|s| s.organization_id == ctx.organization_id)
        .filter(|s| match ctx.role {
            Role::Doctor => ctx.entity_id.is_some() && s.assigned_doctor_id == ctx.entity_id,
            Role::Caregiver => {
                ctx.entity_id.is_some() && s.assigned_caregiver_id == ctx.entity_id
            }
            _ => true,
        })
        .cloned()
        .collect()
}
