//! CLI for the MediTrack client.

mod app;
mod commands;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use meditrack_core::config;
use meditrack_core::model::{MeasurementKind, PlanType, Role};

use app::App;
use commands::{
    run_alerts, run_assign, run_caregivers, run_devices, run_doctors, run_logout,
    run_measurements, run_relative, run_seniors, run_sign_in, run_sign_up, run_users,
    run_whoami, SignUpArgs,
};

/// Top-level CLI for the MediTrack eldercare platform.
#[derive(Debug, Parser)]
#[command(name = "meditrack")]
#[command(about = "MediTrack: eldercare monitoring client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Sign in and store the session.
    SignIn {
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Register a new account.
    SignUp(SignUpArgs),

    /// Drop the stored session.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// List the user directory.
    Users,

    /// List senior citizens visible to the signed-in user.
    Seniors {
        /// Show every senior of the organization instead of the role-filtered view.
        #[arg(long)]
        all: bool,
    },

    /// List the organization's doctors.
    Doctors,

    /// List the organization's caregivers.
    Caregivers,

    /// Assign a doctor or caregiver to a senior citizen.
    #[command(group(ArgGroup::new("target").required(true).args(["doctor", "caregiver"])))]
    Assign {
        /// Senior citizen id.
        senior: i64,
        #[arg(long)]
        doctor: Option<i64>,
        #[arg(long)]
        caregiver: Option<i64>,
    },

    /// Remove a doctor or caregiver assignment.
    #[command(group(ArgGroup::new("target").required(true).args(["doctor", "caregiver"])))]
    Unassign {
        senior: i64,
        #[arg(long)]
        doctor: Option<i64>,
        #[arg(long)]
        caregiver: Option<i64>,
    },

    /// List monitoring devices.
    Devices,

    /// List alerts, optionally for one device.
    Alerts {
        #[arg(long)]
        device: Option<i64>,
    },

    /// Show vital-sign series of a device (all four kinds unless --kind is given).
    Measurements {
        device: i64,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Show the signed-in relative's record and plan.
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    BloodPressure,
    Temperature,
    Oxygen,
    HeartRate,
}

impl From<KindArg> for MeasurementKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::BloodPressure => MeasurementKind::BloodPressure,
            KindArg::Temperature => MeasurementKind::Temperature,
            KindArg::Oxygen => MeasurementKind::Oxygen,
            KindArg::HeartRate => MeasurementKind::HeartRate,
        }
    }
}

pub(crate) fn parse_role(s: &str) -> Result<Role, String> {
    Role::parse(s).ok_or_else(|| format!("unknown role {s:?}"))
}

pub(crate) fn parse_plan(s: &str) -> Result<PlanType, String> {
    PlanType::parse(s).ok_or_else(|| format!("unknown plan {s:?} (freemium or premium)"))
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let app = App::open(cfg)?;

        match cli.command {
            CliCommand::SignIn { email, password } => run_sign_in(&app, &email, &password).await?,
            CliCommand::SignUp(args) => run_sign_up(&app, args).await?,
            CliCommand::Logout => run_logout(&app),
            CliCommand::Whoami => run_whoami(&app)?,
            CliCommand::Users => run_users(&app).await?,
            CliCommand::Seniors { all } => run_seniors(&app, all).await?,
            CliCommand::Doctors => run_doctors(&app).await?,
            CliCommand::Caregivers => run_caregivers(&app).await?,
            CliCommand::Assign {
                senior,
                doctor,
                caregiver,
            } => run_assign(&app, senior, doctor, caregiver, true).await?,
            CliCommand::Unassign {
                senior,
                doctor,
                caregiver,
            } => run_assign(&app, senior, doctor, caregiver, false).await?,
            CliCommand::Devices => run_devices(&app).await?,
            CliCommand::Alerts { device } => run_alerts(&app, device).await?,
            CliCommand::Measurements { device, kind } => {
                run_measurements(&app, device, kind.map(Into::into)).await?
            }
            CliCommand::Relative => run_relative(&app).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
