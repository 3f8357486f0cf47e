//! Reference HTTPS transport for the protocol handler seam.
//!
//! Posts the payload plus embedded credentials as a JSON body to the
//! project URL and resolves with the parsed response body, falling back to
//! the raw text when the server does not answer with JSON. It illustrates
//! the handler contract; sessions work with any registered transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{NarcisError, Result};
use crate::protocol::{Payload, ProtocolHandler, ProtocolRegistry};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Uploads screenshot payloads to a narcis server over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpsProtocol {
    http: Client,
}

impl HttpsProtocol {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NarcisError::Network)?;

        Ok(Self { http })
    }

    /// Installs this transport under `"https"` in the process-wide
    /// registry.
    pub fn register_default() -> Result<()> {
        let handler = Arc::new(Self::new()?);
        ProtocolRegistry::global().register("https", handler as Arc<dyn ProtocolHandler>);
        Ok(())
    }

    /// The JSON body sent to the server: the payload fields with the
    /// config's credentials spliced in alongside them.
    fn request_body(config: &Config, payload: &Payload<'_>) -> Result<Value> {
        let auth = config.authentication.as_ref().ok_or_else(|| {
            NarcisError::handler("authentication credentials are required for the https protocol")
        })?;

        let mut body = serde_json::to_value(payload)?;
        let map = body
            .as_object_mut()
            .ok_or_else(|| NarcisError::handler("payload did not serialize to a JSON object"))?;
        map.insert("username".to_string(), Value::String(auth.username.clone()));
        map.insert("password".to_string(), Value::String(auth.password.clone()));

        Ok(body)
    }
}

#[async_trait]
impl ProtocolHandler for HttpsProtocol {
    async fn invoke(&self, config: &Config, payload: Payload<'_>) -> Result<Value> {
        let body = Self::request_body(config, &payload)?;
        let project = Url::parse(&config.project)?;

        let response = self
            .http
            .post(project)
            .json(&body)
            .send()
            .await
            .map_err(NarcisError::Network)?;

        // The narcis server answers with JSON; anything else comes back as
        // the raw text so callers can still inspect it.
        let text = response.text().await.map_err(NarcisError::Network)?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Authentication, Platform, TargetIdentity};
    use serde_json::json;
    use std::collections::HashMap;

    fn config() -> Config {
        Config::new("https://narcis.server.example/project-name").with_authentication(
            Authentication::new("username.example", "password.example"),
        )
    }

    fn target() -> TargetIdentity {
        TargetIdentity::new(
            Platform::new("iPhone 6 portrait", "OS X 10.10", "iphone 9.0"),
            "master",
            "0000000",
        )
    }

    #[test]
    fn request_body_embeds_credentials_beside_the_payload() {
        let target = target();
        let mut screenshots = HashMap::new();
        screenshots.insert(
            "page-example-1".to_string(),
            "data:image/png;base64,screenshot+example+1".to_string(),
        );
        let payload = Payload::new(&target, &screenshots);

        let body = HttpsProtocol::request_body(&config(), &payload).unwrap();

        assert_eq!(
            body,
            json!({
                "platform": {
                    "device": "iPhone 6 portrait",
                    "os": "OS X 10.10",
                    "browser": "iphone 9.0",
                },
                "branch": "master",
                "build": "0000000",
                "screenshots": {
                    "page-example-1": "data:image/png;base64,screenshot+example+1",
                },
                "username": "username.example",
                "password": "password.example",
            })
        );
    }

    #[test]
    fn request_body_requires_credentials() {
        let target = target();
        let screenshots = HashMap::new();
        let payload = Payload::new(&target, &screenshots);

        let err = HttpsProtocol::request_body(
            &Config::new("https://narcis.server.example/project-name"),
            &payload,
        )
        .unwrap_err();

        assert!(matches!(err, NarcisError::Handler(_)));
    }
}
