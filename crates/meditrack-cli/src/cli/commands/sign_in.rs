//! `meditrack sign-in <email> --password <pw>`: authenticate and persist the session.

use anyhow::Result;

use crate::cli::app::App;

pub async fn run_sign_in(app: &App, email: &str, password: &str) -> Result<()> {
    let user = app.session.sign_in(email, password).await?;
    println!(
        "Signed in as {} ({})",
        user.email.as_deref().unwrap_or(email),
        user.role
    );
    Ok(())
}
