//! `meditrack whoami` – print the stored session without contacting the API.

use anyhow::Result;

use crate::cli::app::App;

pub fn run_whoami(app: &App) -> Result<()> {
    let user = app.require_user()?;
    println!("{:<14} {}", "email", user.email.as_deref().unwrap_or("-"));
    println!("{:<14} {}", "role", user.role);
    let fmt_id = |id: Option<i64>| id.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    println!("{:<14} {}", "user id", fmt_id(user.id));
    println!("{:<14} {}", "organization", fmt_id(user.organization_id));
    println!("{:<14} {}", "record id", fmt_id(user.entity_id));
    Ok(())
}
