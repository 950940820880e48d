//! `meditrack seniors [--all]` – role-filtered senior citizens of the user's organization.

use anyhow::Result;

use crate::cli::app::App;

pub async fn run_seniors(app: &App, all: bool) -> Result<()> {
    let store = app.scoped_organization().await?;
    store.fetch_senior_citizens().await?;
    let seniors = if all {
        store.senior_citizens()
    } else {
        store.filtered_senior_citizens()
    };
    if seniors.is_empty() {
        println!("No senior citizens.");
        return Ok(());
    }
    println!(
        "{:<6} {:<28} {:<5} {:<8} {:<10}",
        "ID", "NAME", "AGE", "DOCTOR", "CAREGIVER"
    );
    let opt = |id: Option<i64>| id.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    for s in seniors {
        println!(
            "{:<6} {:<28} {:<5} {:<8} {:<10}",
            s.id,
            s.full_name(),
            s.age,
            opt(s.assigned_doctor_id),
            opt(s.assigned_caregiver_id)
        );
    }
    Ok(())
}
