//! Tvheadend recording server queries
//!
//! A single blocking GET against the DVR grid API. There is no retry and no
//! pagination; the limit is large enough to return every finished recording
//! in one response.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::BackendConfig;
use crate::error::{CutterError, Result};
use crate::metrics::MetricsCollector;
use crate::models::RecordingReference;

const FINISHED_PATH: &str = "/api/dvr/entry/grid_finished";

/// One entry of the finished-recordings grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FinishedRecording {
    /// Entry id on the server
    pub uuid: String,
    /// Program title as displayed
    pub disp_title: String,
    /// Channel name
    pub channelname: String,
    /// Start time, seconds since the epoch
    pub start: i64,
    /// Stop time, seconds since the epoch
    pub stop: i64,
    /// Recorded file on the server
    pub filename: String,
    /// Recording status text, e.g. `Completed OK`
    pub status: String,
}

/// Client for one Tvheadend server
#[derive(Debug, Clone)]
pub struct TvheadendClient {
    base_url: String,
    username: String,
    password: String,
    send_credentials: bool,
    finished_limit: u64,
    http: Client,
    metrics: MetricsCollector,
}

impl TvheadendClient {
    /// Create a client. `timeout` of `None` waits indefinitely.
    pub fn new(
        host: &str,
        http_port: u16,
        use_https: bool,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let scheme = if use_https { "https" } else { "http" };
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: format!("{scheme}://{host}:{http_port}"),
            username: username.into(),
            password: password.into(),
            send_credentials: false,
            finished_limit: 999_999,
            http,
            metrics: MetricsCollector::default(),
        })
    }

    /// Client for the configured backend
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let client = Self::new(
            &config.host,
            config.http_port,
            config.use_https,
            config.username.clone(),
            config.password.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )?;
        Ok(client
            .with_credentials(config.send_credentials)
            .with_finished_limit(config.finished_limit))
    }

    /// Send the configured username and password as basic auth.
    #[must_use]
    pub const fn with_credentials(mut self, send: bool) -> Self {
        self.send_credentials = send;
        self
    }

    /// Maximum number of grid entries requested
    #[must_use]
    pub const fn with_finished_limit(mut self, limit: u64) -> Self {
        self.finished_limit = limit;
        self
    }

    /// URL of the finished-recordings grid
    pub fn finished_url(&self) -> String {
        format!("{}{}?limit={}", self.base_url, FINISHED_PATH, self.finished_limit)
    }

    /// Fetch the finished-recordings grid as raw JSON.
    pub fn query_finished_recordings(&self) -> Result<Value> {
        let url = self.finished_url();
        debug!(url = %url, "Querying finished recordings");

        let mut request = self.http.get(&url);
        if self.send_credentials {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request.send().inspect_err(|_| self.metrics.record_backend_request(false))?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            self.metrics.record_backend_request(false);
            return Err(CutterError::Backend { status, body });
        }

        let value: Value = serde_json::from_str(&body).inspect_err(|_| self.metrics.record_backend_request(false))?;
        self.metrics.record_backend_request(true);
        info!(total = ?value.get("total").and_then(serde_json::Value::as_u64), "Fetched finished recordings");
        Ok(value)
    }
}

/// Typed view of the `entries` of a grid response; malformed entries are skipped.
pub fn finished_recordings(grid: &Value) -> Vec<FinishedRecording> {
    grid.get("entries")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| FinishedRecording::deserialize(entry).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// The server entry for a recording parsed from a `pvr://` URL
pub fn find_recording<'a>(
    recordings: &'a [FinishedRecording],
    reference: &RecordingReference,
) -> Option<&'a FinishedRecording> {
    recordings.iter().find(|recording| {
        recording.disp_title == reference.title
            && recording.channelname == reference.channel_name
            && recording.start == reference.start_epoch_seconds
    })
}
