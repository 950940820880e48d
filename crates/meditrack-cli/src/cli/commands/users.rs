//! `meditrack users`

use anyhow::Result;

use crate::cli::app::App;

pub async fn run_users(app: &App) -> Result<()> {
    app.require_user()?;
    let users = app.session.fetch_users().await?;
    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }
    println!("{:<6} {:<10} {}", "ID", "ROLE", "EMAIL");
    for u in users {
        let id = u.id.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        println!("{:<6} {:<10} {}", id, u.role, u.email);
    }
    Ok(())
}
