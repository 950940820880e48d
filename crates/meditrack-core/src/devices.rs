//! Device, alert and vital-sign state.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::api::DevicesApi;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::flight::{FlightKey, SingleFlight};
use crate::http::ApiClient;
use crate::loading::LoadingFlag;
use crate::model::{Alert, Device, MeasurementKind, MeasurementSeries, NewMeasurement};

#[derive(Debug, Default)]
struct DeviceState {
    devices: Vec<Device>,
    devices_loaded: bool,
    device: Option<Device>,
    alerts: Vec<Alert>,
    alerts_loaded: bool,
    measurements: HashMap<(i64, MeasurementKind), MeasurementSeries>,
}

/// The four series of one device, as returned by `fetch_all_measurements`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vitals {
    pub blood_pressure: MeasurementSeries,
    pub temperature: MeasurementSeries,
    pub oxygen: MeasurementSeries,
    pub heart_rate: MeasurementSeries,
}

pub struct DevicesStore {
    api: DevicesApi,
    state: RwLock<DeviceState>,
    errors: Mutex<Vec<ApiError>>,
    loading: LoadingFlag,
    devices_flight: SingleFlight<Vec<Device>>,
    device_flight: SingleFlight<Device>,
    alerts_flight: SingleFlight<Vec<Alert>>,
}

impl DevicesStore {
    pub fn new(api: DevicesApi) -> Self {
        Self {
            api,
            state: RwLock::new(DeviceState::default()),
            errors: Mutex::new(Vec::new()),
            loading: LoadingFlag::new(),
            devices_flight: SingleFlight::new(),
            device_flight: SingleFlight::new(),
            alerts_flight: SingleFlight::new(),
        }
    }

    pub fn from_config(client: ApiClient, cfg: &ClientConfig) -> Self {
        Self::new(DevicesApi::new(client, cfg.endpoints.clone()))
    }

    fn record<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            self.errors.lock().unwrap().push(e.clone());
        }
        result
    }

    pub fn errors(&self) -> Vec<ApiError> {
        self.errors.lock().unwrap().clone()
    }

    pub fn clear_errors(&self) {
        self.errors.lock().unwrap().clear();
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    // Devices

    pub async fn fetch_devices(&self) -> Result<Vec<Device>, ApiError> {
        let _loading = self.loading.begin();
        let result = self
            .devices_flight
            .run(FlightKey::unscoped("devices"), || self.api.fetch_devices())
            .await;
        if let Ok(list) = &result {
            let mut state = self.state.write().unwrap();
            state.devices = list.clone();
            state.devices_loaded = true;
        }
        self.record(result)
    }

    /// Fetch one device and make it the current one.
    pub async fn fetch_device_by_id(&self, id: i64) -> Result<Device, ApiError> {
        let _loading = self.loading.begin();
        let result = self
            .device_flight
            .run(FlightKey::new("device", id), || self.api.fetch_device(id))
            .await;
        if let Ok(device) = &result {
            let mut state = self.state.write().unwrap();
            replace_device(&mut state.devices, device.clone());
            state.device = Some(device.clone());
        }
        self.record(result)
    }

    pub async fn add_device(&self, device: &Device) -> Result<Device, ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.create_device(device).await;
        if let Ok(created) = &result {
            replace_device(&mut self.state.write().unwrap().devices, created.clone());
        }
        self.record(result)
    }

    pub fn devices(&self) -> Vec<Device> {
        self.state.read().unwrap().devices.clone()
    }

    pub fn devices_loaded(&self) -> bool {
        self.state.read().unwrap().devices_loaded
    }

    pub fn device(&self) -> Option<Device> {
        self.state.read().unwrap().device.clone()
    }

    pub fn device_by_id(&self, id: i64) -> Option<Device> {
        let state = self.state.read().unwrap();
        state.devices.iter().find(|d| d.device_id == id).cloned()
    }

    pub fn active_devices(&self) -> Vec<Device> {
        let state = self.state.read().unwrap();
        state.devices.iter().filter(|d| d.is_active()).cloned().collect()
    }

    // Alerts

    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        let _loading = self.loading.begin();
        let result = self
            .alerts_flight
            .run(FlightKey::unscoped("alerts"), || self.api.fetch_alerts())
            .await;
        if let Ok(list) = &result {
            let mut state = self.state.write().unwrap();
            state.alerts = list.clone();
            state.alerts_loaded = true;
        }
        self.record(result)
    }

    /// Refresh the alert list and return the alerts raised by `device_id`.
    pub async fn fetch_alerts_by_device(&self, device_id: i64) -> Result<Vec<Alert>, ApiError> {
        let alerts = self.fetch_alerts().await?;
        Ok(alerts
            .into_iter()
            .filter(|a| a.device_id == Some(device_id))
            .collect())
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.state.read().unwrap().alerts.clone()
    }

    pub fn alerts_loaded(&self) -> bool {
        self.state.read().unwrap().alerts_loaded
    }

    pub fn alerts_by_device(&self, device_id: i64) -> Vec<Alert> {
        let state = self.state.read().unwrap();
        state
            .alerts
            .iter()
            .filter(|a| a.device_id == Some(device_id))
            .cloned()
            .collect()
    }

    // Measurements

    /// Record a reading. The device returned by the backend replaces the cached one.
    pub async fn add_measurement(
        &self,
        device_id: i64,
        measurement: NewMeasurement,
    ) -> Result<Device, ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.add_measurement(device_id, measurement).await;
        if let Ok(device) = &result {
            let mut state = self.state.write().unwrap();
            // The cached series is stale now.
            state.measurements.remove(&(device_id, measurement.kind()));
            replace_device(&mut state.devices, device.clone());
            if state.device.as_ref().is_some_and(|d| d.device_id == device.device_id) {
                state.device = Some(device.clone());
            }
        }
        self.record(result)
    }

    pub async fn fetch_measurements(
        &self,
        device_id: i64,
        kind: MeasurementKind,
    ) -> Result<MeasurementSeries, ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.fetch_measurements(device_id, kind).await;
        if let Ok(series) = &result {
            self.state
                .write()
                .unwrap()
                .measurements
                .insert((device_id, kind), series.clone());
        }
        self.record(result)
    }

    /// Fetch the four series of a device concurrently. Fails with the first error
    /// (in blood pressure, temperature, oxygen, heart rate order).
    pub async fn fetch_all_measurements(&self, device_id: i64) -> Result<Vitals, ApiError> {
        let (blood_pressure, temperature, oxygen, heart_rate) = tokio::join!(
            self.fetch_measurements(device_id, MeasurementKind::BloodPressure),
            self.fetch_measurements(device_id, MeasurementKind::Temperature),
            self.fetch_measurements(device_id, MeasurementKind::Oxygen),
            self.fetch_measurements(device_id, MeasurementKind::HeartRate),
        );
        Ok(Vitals {
            blood_pressure: blood_pressure?,
            temperature: temperature?,
            oxygen: oxygen?,
            heart_rate: heart_rate?,
        })
    }

    pub fn measurements(&self, device_id: i64, kind: MeasurementKind) -> Option<MeasurementSeries> {
        self.state
            .read()
            .unwrap()
            .measurements
            .get(&(device_id, kind))
            .cloned()
    }
}

fn replace_device(devices: &mut Vec<Device>, device: Device) {
    match devices.iter_mut().find(|d| d.device_id == device.device_id) {
        Some(slot) => *slot = device,
        None => devices.push(device),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointPaths;
    use crate::http::mock::MockTransport;
    use crate::http::Method;
    use crate::storage::ClientStorage;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn store() -> (Arc<MockTransport>, DevicesStore) {
        let mock = Arc::new(MockTransport::new());
        let client =
            ApiClient::new("http://api.test/api/v1", mock.clone(), ClientStorage::in_memory())
                .unwrap();
        let store = DevicesStore::new(DevicesApi::new(client, EndpointPaths::default()));
        (mock, store)
    }

    #[tokio::test]
    async fn devices_are_fetched_once_for_concurrent_callers() {
        let (mock, store) = store();
        mock.set_delay(Duration::from_millis(50));
        mock.on(
            Method::Get,
            "/devices",
            200,
            json!({"devices": [
                {"deviceId": 1, "model": "MT-100", "status": "active", "holderId": 3, "holderType": "senior"},
                {"deviceId": 2, "model": "MT-100", "status": "inactive"}
            ]}),
        );
        let (a, b) = tokio::join!(store.fetch_devices(), store.fetch_devices());
        assert_eq!(a.unwrap().len(), 2);
        assert_eq!(b.unwrap().len(), 2);
        assert_eq!(mock.count(Method::Get, "/devices"), 1);
        assert!(store.devices_loaded());
        assert_eq!(store.device_by_id(1).unwrap().holder_id, Some(3));
        assert_eq!(store.active_devices().len(), 1);
    }

    #[tokio::test]
    async fn device_by_id_becomes_current() {
        let (mock, store) = store();
        mock.on(Method::Get, "/devices/4", 200, json!({"deviceId": 4, "status": "active"}));
        mock.on(Method::Get, "/devices/5", 404, Value::Null);

        let d = store.fetch_device_by_id(4).await.unwrap();
        assert_eq!(store.device(), Some(d));
        let err = store.fetch_device_by_id(5).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { status: 404, .. }));
        assert_eq!(store.device().unwrap().device_id, 4);
        assert_eq!(store.errors(), vec![err]);
    }

    #[tokio::test]
    async fn alerts_by_device_filters_the_list() {
        let (mock, store) = store();
        mock.on(
            Method::Get,
            "/alerts",
            200,
            json!([
                {"alertId": 1, "deviceId": 4, "eAlertType": "HighHeartRate", "message": "bpm 140"},
                {"alertId": 2, "deviceId": 5},
                {"alertId": 3, "deviceId": 4, "registeredAt": "2024-03-01T10:15:00Z"}
            ]),
        );
        let alerts = store.fetch_alerts_by_device(4).await.unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].title(), "HighHeartRate");
        assert_eq!(alerts[1].reason(), "No reason provided");
        assert_eq!(alerts[1].date(), "2024-03-01");
        assert_eq!(store.alerts().len(), 3);
        assert_eq!(store.alerts_by_device(5).len(), 1);
    }

    #[tokio::test]
    async fn all_measurements_are_fetched_per_kind() {
        let (mock, store) = store();
        mock.on(
            Method::Get,
            "/devices/4/measurements/blood-pressure",
            200,
            json!([{"systolic": 120, "diastolic": 80}]),
        );
        mock.on(Method::Get, "/devices/4/measurements/temperature", 200, json!([{"celsius": 36.6}]));
        mock.on(Method::Get, "/devices/4/measurements/oxygen", 200, json!({"measurements": [{"spo2": 97}]}));
        mock.on(Method::Get, "/devices/4/measurements/heart-rate", 200, json!([{"bpm": 70}, {"bpm": 74}]));

        let vitals = store.fetch_all_measurements(4).await.unwrap();
        assert_eq!(vitals.blood_pressure, MeasurementSeries::Pairs(vec![[80.0, 120.0]]));
        assert_eq!(vitals.temperature, MeasurementSeries::Values(vec![36.6]));
        assert_eq!(vitals.oxygen, MeasurementSeries::Values(vec![97.0]));
        assert_eq!(vitals.heart_rate.len(), 2);
        assert_eq!(
            store.measurements(4, MeasurementKind::HeartRate),
            Some(MeasurementSeries::Values(vec![70.0, 74.0]))
        );
        assert_eq!(mock.requests().len(), 4);
    }

    #[tokio::test]
    async fn one_failing_series_fails_the_batch() {
        let (mock, store) = store();
        for kind in MeasurementKind::ALL {
            mock.on(
                Method::Get,
                &format!("/devices/4/measurements/{}", kind.path_segment()),
                200,
                json!([]),
            );
        }
        mock.on(Method::Get, "/devices/4/measurements/oxygen", 500, Value::Null);
        let err = store.fetch_all_measurements(4).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn add_measurement_posts_reading_and_refreshes_device() {
        let (mock, store) = store();
        mock.on(Method::Get, "/devices/4/measurements/temperature", 200, json!([{"celsius": 36.6}]));
        mock.on(
            Method::Post,
            "/devices/4/measurements/temperature",
            201,
            json!({"deviceId": 4, "status": "active", "measurements": [{"celsius": 37.2}]}),
        );
        store
            .fetch_measurements(4, MeasurementKind::Temperature)
            .await
            .unwrap();

        let device = store
            .add_measurement(4, NewMeasurement::Temperature { celsius: 37.2 })
            .await
            .unwrap();
        assert_eq!(device.measurements.len(), 1);
        let post = mock
            .requests()
            .into_iter()
            .find(|r| r.method == Method::Post)
            .unwrap();
        let sent: Value = serde_json::from_slice(post.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!({"celsius": 37.2}));
        assert!(store.measurements(4, MeasurementKind::Temperature).is_none());
        assert_eq!(store.device_by_id(4), Some(device));
    }
}
