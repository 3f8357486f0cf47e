use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Connection details for a narcis server.
///
/// The core reads only [`project`](Config::project) and
/// [`enabled`](Config::enabled); everything else, including
/// [`authentication`](Config::authentication) and any extra fields, is
/// passed through verbatim to the protocol handler selected at upload time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL of the project on the narcis server. Its scheme selects the
    /// protocol handler used by `Session::upload`.
    pub project: String,
    /// Credentials for the server; consumed by transports, not by the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
    /// Whether uploads happen at all. Anything other than an explicit
    /// `false` counts as enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Transport-specific fields the core does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Config {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            authentication: None,
            enabled: None,
            extra: Map::new(),
        }
    }

    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// `true` unless `enabled` was set to the literal `false`.
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    pub username: String,
    pub password: String,
}

impl Authentication {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Identity of the platform/branch/build under test.
///
/// Opaque to the core: it is bundled into the upload payload exactly as
/// given and never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetIdentity {
    pub platform: Platform,
    pub branch: String,
    pub build: String,
}

impl TargetIdentity {
    pub fn new(platform: Platform, branch: impl Into<String>, build: impl Into<String>) -> Self {
        Self {
            platform,
            branch: branch.into(),
            build: build.into(),
        }
    }
}

/// Device/OS/browser triple describing where the screenshots were taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub device: String,
    pub os: String,
    pub browser: String,
}

impl Platform {
    pub fn new(
        device: impl Into<String>,
        os: impl Into<String>,
        browser: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            os: os.into(),
            browser: browser.into(),
        }
    }
}
