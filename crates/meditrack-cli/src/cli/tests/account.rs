//! Tests for sign-in, sign-up and session subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use meditrack_core::model::{PlanType, Role};

#[test]
fn cli_parse_sign_in() {
    match parse(&["meditrack", "sign-in", "ana@clinic.pe", "--password", "secret123"]) {
        CliCommand::SignIn { email, password } => {
            assert_eq!(email, "ana@clinic.pe");
            assert_eq!(password, "secret123");
        }
        _ => panic!("expected SignIn"),
    }
}

#[test]
fn cli_parse_sign_in_requires_password() {
    assert!(Cli::try_parse_from(["meditrack", "sign-in", "ana@clinic.pe"]).is_err());
}

#[test]
fn cli_parse_sign_up_admin() {
    match parse(&[
        "meditrack",
        "sign-up",
        "admin@sol.pe",
        "--password",
        "secret123",
        "--role",
        "ADMIN",
        "--admin-first-name",
        "Rosa",
        "--admin-last-name",
        "Quispe",
        "--institution-name",
        "Clinica Sol",
        "--institution-type",
        "clinic",
    ]) {
        CliCommand::SignUp(args) => {
            assert_eq!(args.role, Role::Admin);
            assert_eq!(args.admin_first_name.as_deref(), Some("Rosa"));
            assert_eq!(args.institution_name.as_deref(), Some("Clinica Sol"));
            assert_eq!(args.institution_type.as_deref(), Some("clinic"));
            assert!(args.plan.is_none());
            assert_eq!(args.payment_provider, "card");
        }
        _ => panic!("expected SignUp"),
    }
}

#[test]
fn cli_parse_sign_up_relative_plan() {
    match parse(&[
        "meditrack",
        "sign-up",
        "lucia@mail.pe",
        "--password",
        "secret123",
        "--role",
        "relative",
        "--plan",
        "premium",
        "--payment-receipt",
        "rcpt-1",
    ]) {
        CliCommand::SignUp(args) => {
            assert_eq!(args.role, Role::Relative);
            assert_eq!(args.plan, Some(PlanType::Premium));
            assert_eq!(args.payment_receipt.as_deref(), Some("rcpt-1"));
        }
        _ => panic!("expected SignUp"),
    }
}

#[test]
fn cli_parse_sign_up_rejects_unknown_role_and_plan() {
    let base = ["meditrack", "sign-up", "x@y.pe", "--password", "secret123"];
    let mut bad_role = base.to_vec();
    bad_role.extend(["--role", "nurse"]);
    assert!(Cli::try_parse_from(bad_role).is_err());

    let mut bad_plan = base.to_vec();
    bad_plan.extend(["--role", "relative", "--plan", "gold"]);
    assert!(Cli::try_parse_from(bad_plan).is_err());
}

#[test]
fn cli_parse_session_commands() {
    assert!(matches!(parse(&["meditrack", "logout"]), CliCommand::Logout));
    assert!(matches!(parse(&["meditrack", "whoami"]), CliCommand::Whoami));
    assert!(matches!(parse(&["meditrack", "relative"]), CliCommand::Relative));
}
