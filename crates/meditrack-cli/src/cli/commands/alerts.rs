//! `meditrack alerts [--device <id>]`

use anyhow::Result;

use crate::cli::app::App;

pub async fn run_alerts(app: &App, device: Option<i64>) -> Result<()> {
    app.require_user()?;
    let store = app.devices();
    let alerts = match device {
        Some(id) => store.fetch_alerts_by_device(id).await?,
        None => store.fetch_alerts().await?,
    };
    if alerts.is_empty() {
        println!("No alerts.");
        return Ok(());
    }
    println!("{:<10} {:<8} {:<20} {}", "DATE", "TIME", "ALERT", "REASON");
    for a in alerts {
        println!("{:<10} {:<8} {:<20} {}", a.date(), a.time(), a.title(), a.reason());
    }
    Ok(())
}
