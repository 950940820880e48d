//! `meditrack relative` – the signed-in relative's record.

use anyhow::Result;

use crate::cli::app::App;

pub async fn run_relative(app: &App) -> Result<()> {
    let user = app.require_user()?;
    let store = app.relatives();
    let relative = store.fetch_relative_for(&user).await?;
    println!("{:<14} {}", "name", relative.full_name());
    println!("{:<14} {}", "phone", relative.phone_number);
    println!("{:<14} {}", "plan", relative.plan_type);
    if let Some(senior) = &relative.senior_citizen {
        println!("{:<14} {} (#{})", "senior", senior.full_name(), senior.id);
    } else if let Some(id) = relative.senior_citizen_id {
        println!("{:<14} #{}", "senior", id);
    }
    if store.is_premium() {
        println!("Premium plan: live vitals and alerts enabled.");
    }
    Ok(())
}
