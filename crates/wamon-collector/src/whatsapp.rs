//! WhatsApp API probe
//!
//! Two sequential calls against the multi-device API: list devices, then
//! list the first device's groups. The second call needs the device id
//! produced by the first, but its failure is informational only and never
//! touches the connectivity gauges already set.

use crate::error::{CollectorError, CollectorResult};
use crate::runner::Collect;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use wamon_metrics::ExporterMetrics;

const DEVICES_ENDPOINT: &str = "/app/devices";
const GROUPS_ENDPOINT: &str = "/user/my/groups";

/// Probe of the WhatsApp multi-device HTTP API
pub struct WhatsappProbe {
    client: reqwest::Client,
    base_url: String,
    auth: Option<(String, String)>,
    metrics: Arc<ExporterMetrics>,
}

#[derive(Debug, Default, Deserialize)]
struct DevicesResponse {
    #[serde(default)]
    results: Vec<DeviceEntry>,
}

#[derive(Debug, Deserialize)]
struct DeviceEntry {
    #[serde(default)]
    device: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct GroupsResponse {
    #[serde(default)]
    results: GroupsPayload,
}

#[derive(Debug, Default, Deserialize)]
struct GroupsPayload {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

impl WhatsappProbe {
    /// Create a probe against the given API base URL
    ///
    /// The client is expected to carry the request timeout; credentials,
    /// when present, are attached per request as basic auth.
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        auth: Option<(String, String)>,
        metrics: Arc<ExporterMetrics>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            auth,
            metrics,
        }
    }

    fn get(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.get(format!("{}{}", self.base_url, endpoint));
        if let Some((user, password)) = &self.auth {
            req = req.basic_auth(user, Some(password));
        }
        req
    }

    /// Fetch and decode the device list, classifying the failure mode
    async fn fetch_devices(&self) -> CollectorResult<DevicesResponse> {
        let started = Instant::now();
        let response = self
            .get(DEVICES_ENDPOINT)
            .send()
            .await
            .map_err(|e| CollectorError::Connection(e.to_string()))?;
        self.metrics
            .whatsapp
            .observe_api_latency(DEVICES_ENDPOINT, started.elapsed().as_secs_f64());

        if !response.status().is_success() {
            return Err(CollectorError::Api(format!(
                "device listing returned {}",
                response.status()
            )));
        }

        response
            .json::<DevicesResponse>()
            .await
            .map_err(|e| CollectorError::Api(e.to_string()))
    }

    /// List devices and set the connectivity gauges
    ///
    /// Returns the first device's id when one is connected.
    async fn probe_devices(&self) -> Option<String> {
        let whatsapp = &self.metrics.whatsapp;

        let body = match self.fetch_devices().await {
            Ok(body) => body,
            Err(e) => {
                whatsapp.connection_status.set(0);
                let kind = match &e {
                    CollectorError::Connection(_) => "remote_connection_error",
                    _ => "remote_api_error",
                };
                self.metrics.scrape.record_error(kind);
                warn!(error = %e, "WhatsApp device listing failed");
                return None;
            }
        };

        whatsapp.devices_total.set(body.results.len() as i64);
        whatsapp
            .connection_status
            .set(if body.results.is_empty() { 0 } else { 1 });

        body.results.first().map(|device| {
            whatsapp.set_device_info(&device.name, &device.device);
            device.device.clone()
        })
    }

    /// List the device's groups, for informational logging only
    async fn probe_groups(&self, device_id: &str) {
        let started = Instant::now();
        let result = self
            .get(GROUPS_ENDPOINT)
            .header("X-Device-Id", device_id)
            .send()
            .await;

        let response = match result {
            Ok(response) => {
                self.metrics
                    .whatsapp
                    .observe_api_latency(GROUPS_ENDPOINT, started.elapsed().as_secs_f64());
                response
            }
            Err(e) => {
                warn!(error = %e, "Failed to get groups from WhatsApp API");
                return;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "Group listing returned error status");
            return;
        }

        match response.json::<GroupsResponse>().await {
            Ok(body) => {
                info!(
                    count = body.results.data.len(),
                    "Retrieved groups from WhatsApp API"
                );
            }
            Err(e) => warn!(error = %e, "Failed to decode group list"),
        }
    }
}

#[async_trait]
impl Collect for WhatsappProbe {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    async fn collect(&self) -> CollectorResult<()> {
        if let Some(device_id) = self.probe_devices().await {
            self.probe_groups(&device_id).await;
        }
        Ok(())
    }
}
