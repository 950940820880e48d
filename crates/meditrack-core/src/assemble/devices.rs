use serde_json::Value;

use super::{collection, entity, lookup};
use crate::error::ApiError;
use crate::model::{Alert, Device, MeasurementKind, MeasurementSeries};

pub fn device(resource: &Value) -> Result<Device, ApiError> {
    entity(resource)
}

pub fn devices(body: &Value) -> Result<Vec<Device>, ApiError> {
    collection(body, "devices")?.iter().map(device).collect()
}

pub fn alert(resource: &Value) -> Result<Alert, ApiError> {
    entity(resource)
}

pub fn alerts(body: &Value) -> Result<Vec<Alert>, ApiError> {
    collection(body, "alerts")?.iter().map(alert).collect()
}

fn number(reading: &Value, field: &str) -> Option<f64> {
    lookup(reading, field)?.as_f64()
}

/// Chart series for one measurement kind. Readings missing their value are skipped.
pub fn measurement_series(kind: MeasurementKind, body: &Value) -> Result<MeasurementSeries, ApiError> {
    let readings = collection(body, "measurements")?;
    let total = readings.len();
    let series = match kind {
        MeasurementKind::BloodPressure => MeasurementSeries::Pairs(
            readings
                .iter()
                .filter_map(|r| Some([number(r, "diastolic")?, number(r, "systolic")?]))
                .collect(),
        ),
        other => MeasurementSeries::Values(
            readings
                .iter()
                .filter_map(|r| number(r, other.value_field()))
                .collect(),
        ),
    };
    if series.len() < total {
        tracing::debug!(
            kind = kind.path_segment(),
            skipped = total - series.len(),
            "skipped measurements without a value"
        );
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blood_pressure_is_diastolic_then_systolic() {
        let body = json!([
            {"systolic": 120, "diastolic": 80},
            {"systolic": 135.5, "diastolic": 85}
        ]);
        let s = measurement_series(MeasurementKind::BloodPressure, &body).unwrap();
        assert_eq!(s, MeasurementSeries::Pairs(vec![[80.0, 120.0], [85.0, 135.5]]));
    }

    #[test]
    fn scalar_series_skip_incomplete_readings() {
        let body = json!([{"bpm": 72}, {"bpm": null}, {"spo2": 97}]);
        let s = measurement_series(MeasurementKind::HeartRate, &body).unwrap();
        assert_eq!(s, MeasurementSeries::Values(vec![72.0]));
        let s = measurement_series(MeasurementKind::Oxygen, &body).unwrap();
        assert_eq!(s, MeasurementSeries::Values(vec![97.0]));
    }

    #[test]
    fn device_measurements_default_to_empty() {
        let d = device(&json!({"deviceId": 3, "status": "active", "measurements": null})).unwrap();
        assert!(d.is_active());
        assert!(d.measurements.is_empty());
    }

    #[test]
    fn alerts_keep_device_link() {
        let list = alerts(&json!([
            {"alertId": 1, "deviceId": 3, "eAlertType": "LOW_OXYGEN", "dataRegistered": 88},
            {"alertId": 2, "deviceId": 4}
        ]))
        .unwrap();
        assert_eq!(list[0].device_id, Some(3));
        assert_eq!(list[0].data_registered, 88.0);
        assert_eq!(list[1].title(), "Alert");
    }
}
