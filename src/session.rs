//! Per-run session state: target identity, capture cache, upload dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::config::{Config, TargetIdentity};
use crate::driver::Driver;
use crate::error::{NarcisError, Result};
use crate::protocol::{Payload, ProtocolRegistry};

/// Tracks one test run's identity, driver handle, and accumulated
/// screenshots, and dispatches the upload to the protocol handler
/// registered for the project URL's scheme.
///
/// A session is created per run (or per page set) and discarded after
/// upload; the registry it consults outlives every session.
pub struct Session {
    config: Config,
    target: TargetIdentity,
    enabled: bool,
    driver: Option<Arc<dyn Driver>>,
    screenshots: HashMap<String, String>,
    registry: Arc<ProtocolRegistry>,
}

impl Session {
    /// Creates a session backed by the process-wide protocol registry.
    ///
    /// `enabled` is computed once from the config: anything other than an
    /// explicit `false` leaves uploads on. No I/O happens here.
    pub fn new(config: Config, target: TargetIdentity) -> Self {
        Self::with_registry(config, target, ProtocolRegistry::global())
    }

    /// Creates a session consulting `registry` instead of the process-wide
    /// default. Tests use this to avoid cross-test registry state.
    pub fn with_registry(
        config: Config,
        target: TargetIdentity,
        registry: Arc<ProtocolRegistry>,
    ) -> Self {
        let enabled = config.is_enabled();
        Self {
            config,
            target,
            enabled,
            driver: None,
            screenshots: HashMap::new(),
            registry,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn target(&self) -> &TargetIdentity {
        &self.target
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn driver(&self) -> Option<&Arc<dyn Driver>> {
        self.driver.as_ref()
    }

    /// Screenshots captured so far, keyed by page identifier.
    pub fn screenshots(&self) -> &HashMap<String, String> {
        &self.screenshots
    }

    /// Attaches the driver used for subsequent captures, replacing any
    /// previous one. The session shares the handle; it never quits or
    /// disposes the driver.
    pub fn attach_driver(&mut self, driver: Arc<dyn Driver>) {
        self.driver = Some(driver);
    }

    /// Captures the current view and stores it under `page`, overwriting
    /// any earlier capture for the same key. Returns the captured data.
    ///
    /// Fails with [`NarcisError::DriverUnattached`] when no driver has been
    /// attached; sequencing `attach_driver` before `capture` is the
    /// caller's responsibility, as is awaiting one capture before issuing
    /// the next when ordering matters.
    pub async fn capture(&mut self, page: impl Into<String>) -> Result<String> {
        let driver = self.driver.as_ref().ok_or(NarcisError::DriverUnattached)?;

        let data = driver.take_screenshot().await?;
        self.screenshots.insert(page.into(), data.clone());
        Ok(data)
    }

    /// Uploads the accumulated screenshots through the handler registered
    /// for the project URL's scheme.
    ///
    /// Returns `Ok(None)` without side effects when the session is
    /// disabled. Otherwise resolves the scheme against the registry, hands
    /// the handler the config plus a payload borrowing the live screenshot
    /// map, and returns the handler's result unchanged. The capture map is
    /// never cleared by an upload.
    ///
    /// Fails with [`NarcisError::UnsupportedScheme`] when nothing is
    /// registered for the scheme, before any handler work happens; handler
    /// failures propagate as-is.
    pub async fn upload(&self) -> Result<Option<Value>> {
        if !self.enabled {
            return Ok(None);
        }

        let scheme = Url::parse(&self.config.project)?.scheme().to_string();
        let handler = self
            .registry
            .resolve(&scheme)
            .ok_or(NarcisError::UnsupportedScheme(scheme))?;

        let payload = Payload::new(&self.target, &self.screenshots);
        let result = handler.invoke(&self.config, payload).await?;
        Ok(Some(result))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("project", &self.config.project)
            .field("enabled", &self.enabled)
            .field("driver_attached", &self.driver.is_some())
            .field("screenshots", &self.screenshots.len())
            .finish()
    }
}
