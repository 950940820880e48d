//! `meditrack sign-up` – fill the registration flow from flags and submit it.

use anyhow::Result;
use clap::Args;
use meditrack_core::model::{PlanType, Role};
use meditrack_core::registration::Payment;
use meditrack_core::session::SignUpRequest;
use meditrack_core::ApiError;

use crate::cli::app::App;
use crate::cli::{parse_plan, parse_role};

#[derive(Debug, Clone, Args)]
pub struct SignUpArgs {
    pub email: String,
    #[arg(long)]
    pub password: String,
    /// admin, doctor, caregiver or relative.
    #[arg(long, value_parser = parse_role)]
    pub role: Role,
    #[arg(long)]
    pub admin_first_name: Option<String>,
    #[arg(long)]
    pub admin_last_name: Option<String>,
    #[arg(long)]
    pub institution_name: Option<String>,
    /// e.g. clinic, resident.
    #[arg(long)]
    pub institution_type: Option<String>,
    /// freemium or premium (relatives).
    #[arg(long, value_parser = parse_plan)]
    pub plan: Option<PlanType>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Checkout receipt; marks the payment as confirmed.
    #[arg(long)]
    pub payment_receipt: Option<String>,
    #[arg(long, default_value = "card")]
    pub payment_provider: String,
}

pub async fn run_sign_up(app: &App, args: SignUpArgs) -> Result<()> {
    app.session.with_registration(|flow| {
        flow.clear();
        flow.set_user_data(&args.email, &args.password, args.role.as_str());
        if args.admin_first_name.is_some() || args.admin_last_name.is_some() {
            flow.set_admin_data(
                args.admin_first_name.as_deref().unwrap_or_default(),
                args.admin_last_name.as_deref().unwrap_or_default(),
            );
        }
        if let Some(name) = &args.institution_name {
            flow.set_institution_data(name, args.institution_type.as_deref());
        }
        if let Some(plan) = args.plan {
            flow.set_plan_type(plan.as_str());
        }
        if args.first_name.is_some() || args.last_name.is_some() {
            flow.set_user_names(
                args.first_name.as_deref().unwrap_or_default(),
                args.last_name.as_deref().unwrap_or_default(),
            );
        }
        flow.set_payment_info(args.payment_receipt.as_ref().map(|receipt| Payment {
            provider: args.payment_provider.clone(),
            receipt_id: receipt.clone(),
            confirmed: true,
        }));
    });

    match app.session.sign_up(SignUpRequest::Pending).await {
        Ok(user) => {
            println!("Registered {} as {}", args.email, user.role);
            Ok(())
        }
        Err(ApiError::Validation(reasons)) => {
            for r in &reasons {
                eprintln!("  - {r}");
            }
            anyhow::bail!("registration is incomplete ({} problem(s))", reasons.len())
        }
        Err(e) => Err(e.into()),
    }
}
