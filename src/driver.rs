//! The capture seam between a session and whatever automates the browser.

use async_trait::async_trait;

use crate::error::Result;

/// Capability to capture the browser's current view.
///
/// Implemented over a webdriver client, a devtools connection, or anything
/// else that can produce string-encoded image data (typically a base64 data
/// URL — the encoding is opaque to this crate). The session holds a shared
/// handle and never shuts the driver down; lifecycle stays with the caller.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Takes a screenshot of the current view.
    async fn take_screenshot(&self) -> Result<String>;
}
