//! `meditrack caregivers`

use anyhow::Result;

use crate::cli::app::App;

pub async fn run_caregivers(app: &App) -> Result<()> {
    let store = app.scoped_organization().await?;
    store.fetch_caregivers().await?;
    let caregivers = store.caregivers_by_organization();
    if caregivers.is_empty() {
        println!("No caregivers.");
        return Ok(());
    }
    println!("{:<6} {:<28} {:<16} {}", "ID", "NAME", "PHONE", "SENIORS");
    for c in caregivers {
        println!(
            "{:<6} {:<28} {:<16} {}",
            c.id,
            c.full_name(),
            c.phone_number,
            c.assigned_senior_ids.len()
        );
    }
    Ok(())
}
