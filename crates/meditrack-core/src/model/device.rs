use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Monitoring device worn by (or installed for) a senior citizen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    pub device_id: i64,
    pub model: String,
    pub status: String,
    pub holder_id: Option<i64>,
    pub holder_type: String,
    pub measurements: Vec<Value>,
}

impl Device {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// Alert raised by a device.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Alert {
    pub alert_id: Option<i64>,
    pub device_id: Option<i64>,
    #[serde(rename = "eAlertType")]
    pub alert_type: String,
    pub message: String,
    pub data_registered: f64,
    pub registered_at: Option<String>,
}

impl Alert {
    pub fn title(&self) -> &str {
        if self.alert_type.is_empty() {
            "Alert"
        } else {
            &self.alert_type
        }
    }

    pub fn reason(&self) -> &str {
        if self.message.is_empty() {
            "No reason provided"
        } else {
            &self.message
        }
    }

    /// `registeredAt` as a timestamp (RFC 3339, or a naive ISO date-time).
    pub fn registered_at_time(&self) -> Option<NaiveDateTime> {
        let raw = self.registered_at.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
    }

    pub fn date(&self) -> String {
        self.registered_at_time()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn time(&self) -> String {
        self.registered_at_time()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default()
    }
}

/// The four vital-sign series a device records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    BloodPressure,
    Temperature,
    Oxygen,
    HeartRate,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 4] = [
        MeasurementKind::BloodPressure,
        MeasurementKind::Temperature,
        MeasurementKind::Oxygen,
        MeasurementKind::HeartRate,
    ];

    /// Path segment under `devices/{id}/measurements/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            MeasurementKind::BloodPressure => "blood-pressure",
            MeasurementKind::Temperature => "temperature",
            MeasurementKind::Oxygen => "oxygen",
            MeasurementKind::HeartRate => "heart-rate",
        }
    }

    /// Field carrying the scalar reading (blood pressure has two, see `MeasurementSeries`).
    pub fn value_field(self) -> &'static str {
        match self {
            MeasurementKind::BloodPressure => "systolic",
            MeasurementKind::Temperature => "celsius",
            MeasurementKind::Oxygen => "spo2",
            MeasurementKind::HeartRate => "bpm",
        }
    }
}

/// Chart-ready series: blood pressure as `[diastolic, systolic]`, everything else as values.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementSeries {
    Pairs(Vec<[f64; 2]>),
    Values(Vec<f64>),
}

impl MeasurementSeries {
    pub fn len(&self) -> usize {
        match self {
            MeasurementSeries::Pairs(p) => p.len(),
            MeasurementSeries::Values(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A reading to record on a device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NewMeasurement {
    BloodPressure { systolic: f64, diastolic: f64 },
    Temperature { celsius: f64 },
    Oxygen { spo2: f64 },
    HeartRate { bpm: f64 },
}

impl NewMeasurement {
    pub fn kind(&self) -> MeasurementKind {
        match self {
            NewMeasurement::BloodPressure { .. } => MeasurementKind::BloodPressure,
            NewMeasurement::Temperature { .. } => MeasurementKind::Temperature,
            NewMeasurement::Oxygen { .. } => MeasurementKind::Oxygen,
            NewMeasurement::HeartRate { .. } => MeasurementKind::HeartRate,
        }
    }

    pub fn to_json(&self) -> Value {
        match *self {
            NewMeasurement::BloodPressure {
                systolic,
                diastolic,
            } => json!({ "systolic": systolic, "diastolic": diastolic }),
            NewMeasurement::Temperature { celsius } => json!({ "celsius": celsius }),
            NewMeasurement::Oxygen { spo2 } => json!({ "spo2": spo2 }),
            NewMeasurement::HeartRate { bpm } => json!({ "bpm": bpm }),
        }
    }
}
