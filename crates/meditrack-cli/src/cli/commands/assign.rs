//! `meditrack assign|unassign <senior> --doctor <id> | --caregiver <id>`

use anyhow::{bail, Result};

use crate::cli::app::App;

pub async fn run_assign(
    app: &App,
    senior: i64,
    doctor: Option<i64>,
    caregiver: Option<i64>,
    assign: bool,
) -> Result<()> {
    let store = app.scoped_organization().await?;
    match (doctor, caregiver, assign) {
        (Some(d), _, true) => store.assign_doctor(senior, d).await?,
        (Some(d), _, false) => store.unassign_doctor(senior, d).await?,
        (None, Some(c), true) => store.assign_caregiver(senior, c).await?,
        (None, Some(c), false) => store.unassign_caregiver(senior, c).await?,
        (None, None, _) => bail!("either --doctor or --caregiver is required"),
    }
    let verb = if assign { "Assigned" } else { "Unassigned" };
    match doctor {
        Some(d) => println!("{verb} doctor {d} for senior {senior}"),
        None => println!("{verb} caregiver {} for senior {senior}", caregiver.unwrap_or_default()),
    }
    Ok(())
}
