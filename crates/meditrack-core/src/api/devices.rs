use serde_json::Value;

use super::{create, get_one, list, resource_path};
use crate::assemble::{self, to_resource};
use crate::config::EndpointPaths;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::model::{Alert, Device, MeasurementKind, MeasurementSeries, NewMeasurement};

/// Devices, their alerts and their vital-sign measurements.
#[derive(Debug, Clone)]
pub struct DevicesApi {
    client: ApiClient,
    paths: EndpointPaths,
}

impl DevicesApi {
    pub fn new(client: ApiClient, paths: EndpointPaths) -> Self {
        Self { client, paths }
    }

    pub async fn fetch_devices(&self) -> Result<Vec<Device>, ApiError> {
        list(&self.client, &self.paths.devices, &[], assemble::devices).await
    }

    pub async fn fetch_device(&self, id: i64) -> Result<Device, ApiError> {
        get_one(
            &self.client,
            &resource_path(&self.paths.devices, id),
            &format!("device {id}"),
            assemble::device,
        )
        .await
    }

    pub async fn create_device(&self, device: &Device) -> Result<Device, ApiError> {
        let mut body = to_resource(device, false)?;
        if let Value::Object(map) = &mut body {
            if device.device_id == 0 {
                map.remove("deviceId");
            }
        }
        create(&self.client, &self.paths.devices, &body, assemble::device).await
    }

    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        list(&self.client, &self.paths.alerts, &[], assemble::alerts).await
    }

    pub async fn fetch_alert(&self, id: i64) -> Result<Alert, ApiError> {
        get_one(
            &self.client,
            &resource_path(&self.paths.alerts, id),
            &format!("alert {id}"),
            assemble::alert,
        )
        .await
    }

    fn measurement_path(&self, device_id: i64, kind: MeasurementKind) -> String {
        format!(
            "{}/measurements/{}",
            resource_path(&self.paths.devices, device_id),
            kind.path_segment()
        )
    }

    /// Record a reading; the backend answers with the updated device.
    pub async fn add_measurement(
        &self,
        device_id: i64,
        measurement: NewMeasurement,
    ) -> Result<Device, ApiError> {
        let path = self.measurement_path(device_id, measurement.kind());
        let resp = self.client.post(&path, &measurement.to_json()).await?;
        assemble::device(resp.json()?)
    }

    pub async fn fetch_measurements(
        &self,
        device_id: i64,
        kind: MeasurementKind,
    ) -> Result<MeasurementSeries, ApiError> {
        let resp = self
            .client
            .get(&self.measurement_path(device_id, kind), &[])
            .await?;
        assemble::measurement_series(kind, resp.json()?)
    }
}
