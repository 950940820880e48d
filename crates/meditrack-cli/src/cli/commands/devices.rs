//! `meditrack devices`

use anyhow::Result;

use crate::cli::app::App;

pub async fn run_devices(app: &App) -> Result<()> {
    app.require_user()?;
    let store = app.devices();
    let devices = store.fetch_devices().await?;
    if devices.is_empty() {
        println!("No devices.");
        return Ok(());
    }
    println!("{:<6} {:<16} {:<10} {}", "ID", "MODEL", "STATUS", "HOLDER");
    for d in devices {
        let holder = match d.holder_id {
            Some(id) if d.holder_type.is_empty() => id.to_string(),
            Some(id) => format!("{} {}", d.holder_type, id),
            None => "-".to_string(),
        };
        println!("{:<6} {:<16} {:<10} {}", d.device_id, d.model, d.status, holder);
    }
    Ok(())
}
