//! `meditrack doctors`

use anyhow::Result;

use crate::cli::app::App;

pub async fn run_doctors(app: &App) -> Result<()> {
    let store = app.scoped_organization().await?;
    store.fetch_doctors().await?;
    let doctors = store.doctors_by_organization();
    if doctors.is_empty() {
        println!("No doctors.");
        return Ok(());
    }
    println!("{:<6} {:<28} {:<18} {}", "ID", "NAME", "SPECIALTY", "SENIORS");
    for d in doctors {
        println!(
            "{:<6} {:<28} {:<18} {}",
            d.id,
            d.full_name(),
            d.specialty,
            d.assigned_senior_ids.len()
        );
    }
    Ok(())
}
