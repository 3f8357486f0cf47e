//! Protocol handler registry and the upload dispatch seam.
//!
//! Transports are registered per URL scheme and looked up when a session
//! uploads. The registry is an explicit object rather than hidden global
//! state: production code shares the process-wide default from
//! [`ProtocolRegistry::global`], while tests substitute an isolated
//! instance via `Session::with_registry`.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::{Config, Platform, TargetIdentity};
use crate::error::Result;

/// The bundle a session hands to the protocol handler at upload time.
///
/// Borrows the session's target identity and its live screenshot map, so a
/// handler sees exactly what the session accumulated, not a snapshot.
/// Serializes as `{ platform, branch, build, screenshots }`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Payload<'a> {
    pub platform: &'a Platform,
    pub branch: &'a str,
    pub build: &'a str,
    pub screenshots: &'a HashMap<String, String>,
}

impl<'a> Payload<'a> {
    pub fn new(target: &'a TargetIdentity, screenshots: &'a HashMap<String, String>) -> Self {
        Self {
            platform: &target.platform,
            branch: &target.branch,
            build: &target.build,
            screenshots,
        }
    }
}

/// A transport for delivering screenshot payloads to a narcis server.
///
/// One handler is active per URL scheme at a time. Failures propagate
/// unchanged through `Session::upload`; the core never catches, wraps, or
/// retries them. Retry, backoff, and authentication negotiation all live
/// behind this seam.
#[async_trait]
pub trait ProtocolHandler: Send + Sync {
    async fn invoke(&self, config: &Config, payload: Payload<'_>) -> Result<Value>;
}

/// Scheme-to-handler mapping consulted by `Session::upload`.
#[derive(Default)]
pub struct ProtocolRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn ProtocolHandler>>>,
}

impl ProtocolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared process-wide registry. Created on first use and lives for
    /// the rest of the process.
    pub fn global() -> Arc<ProtocolRegistry> {
        static GLOBAL: OnceLock<Arc<ProtocolRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ProtocolRegistry::new())))
    }

    /// Registers `handler` for `scheme`, replacing any previous handler.
    ///
    /// Scheme keys are lowercase and carry no trailing colon, matching what
    /// [`url::Url::scheme`] produces for the project URL (`"https"`, never
    /// `"https:"`). No shape validation happens here; a broken handler only
    /// surfaces when it is invoked.
    pub fn register(&self, scheme: impl Into<String>, handler: Arc<dyn ProtocolHandler>) {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.insert(scheme.into(), handler);
    }

    /// Looks up the handler registered for `scheme`.
    pub fn resolve(&self, scheme: &str) -> Option<Arc<dyn ProtocolHandler>> {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        handlers.get(scheme).cloned()
    }
}

impl std::fmt::Debug for ProtocolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        let mut schemes: Vec<&str> = handlers.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        f.debug_struct("ProtocolRegistry")
            .field("schemes", &schemes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        calls: AtomicUsize,
        reply: Value,
    }

    impl CountingHandler {
        fn new(reply: Value) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply,
            })
        }
    }

    #[async_trait]
    impl ProtocolHandler for CountingHandler {
        async fn invoke(&self, _config: &Config, _payload: Payload<'_>) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn resolve_returns_the_registered_handler() {
        let registry = ProtocolRegistry::new();
        let handler = CountingHandler::new(Value::Null);

        registry.register("https", Arc::clone(&handler) as Arc<dyn ProtocolHandler>);

        let resolved = registry.resolve("https").expect("handler for https");
        assert!(Arc::ptr_eq(
            &resolved,
            &(handler as Arc<dyn ProtocolHandler>)
        ));
    }

    #[test]
    fn resolve_misses_for_unregistered_scheme() {
        let registry = ProtocolRegistry::new();

        assert!(registry.resolve("ftp").is_none());
    }

    #[test]
    fn registration_does_not_invoke_the_handler() {
        let registry = ProtocolRegistry::new();
        let handler = CountingHandler::new(Value::Null);

        registry.register("https", Arc::clone(&handler) as Arc<dyn ProtocolHandler>);

        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn last_registration_wins() {
        let registry = ProtocolRegistry::new();
        let first = CountingHandler::new(Value::String("first".into()));
        let second = CountingHandler::new(Value::String("second".into()));

        registry.register("https", first as Arc<dyn ProtocolHandler>);
        registry.register("https", Arc::clone(&second) as Arc<dyn ProtocolHandler>);

        let resolved = registry.resolve("https").expect("handler for https");
        assert!(Arc::ptr_eq(
            &resolved,
            &(second as Arc<dyn ProtocolHandler>)
        ));
    }

    #[test]
    fn scheme_lookup_is_case_sensitive() {
        let registry = ProtocolRegistry::new();
        registry.register("https", CountingHandler::new(Value::Null) as Arc<dyn ProtocolHandler>);

        assert!(registry.resolve("HTTPS").is_none());
    }

    #[test]
    fn payload_serializes_with_original_field_names() {
        let target = TargetIdentity::new(
            Platform::new("iPhone 6 portrait", "OS X 10.10", "iphone 9.0"),
            "master",
            "0000000",
        );
        let mut screenshots = HashMap::new();
        screenshots.insert(
            "page-example-1".to_string(),
            "data:image/png;base64,screenshot+example+1".to_string(),
        );

        let value = serde_json::to_value(Payload::new(&target, &screenshots)).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
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
            })
        );
    }
}
