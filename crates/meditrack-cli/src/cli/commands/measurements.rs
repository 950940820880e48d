//! `meditrack measurements <device> [--kind ...]`

use anyhow::Result;
use meditrack_core::model::{MeasurementKind, MeasurementSeries};

use crate::cli::app::App;

fn print_series(kind: MeasurementKind, series: &MeasurementSeries) {
    let rendered: Vec<String> = match series {
        MeasurementSeries::Pairs(pairs) => pairs.iter().map(|[d, s]| format!("{s}/{d}")).collect(),
        MeasurementSeries::Values(values) => values.iter().map(|v| v.to_string()).collect(),
    };
    if rendered.is_empty() {
        println!("{:<15} -", kind.path_segment());
    } else {
        println!("{:<15} {}", kind.path_segment(), rendered.join(", "));
    }
}

pub async fn run_measurements(app: &App, device: i64, kind: Option<MeasurementKind>) -> Result<()> {
    app.require_user()?;
    let store = app.devices();
    match kind {
        Some(kind) => {
            let series = store.fetch_measurements(device, kind).await?;
            print_series(kind, &series);
        }
        None => {
            let vitals = store.fetch_all_measurements(device).await?;
            print_series(MeasurementKind::BloodPressure, &vitals.blood_pressure);
            print_series(MeasurementKind::Temperature, &vitals.temperature);
            print_series(MeasurementKind::Oxygen, &vitals.oxygen);
            print_series(MeasurementKind::HeartRate, &vitals.heart_rate);
        }
    }
    Ok(())
}
