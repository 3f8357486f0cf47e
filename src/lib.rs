//! Narcis Webdriver
//!
//! A library for collecting screenshots from a browser-automation session
//! and uploading them to a narcis reporting server. Capture and transport
//! are decoupled: screenshots come from any [`Driver`] implementation, and
//! delivery goes through whichever [`ProtocolHandler`] is registered for
//! the project URL's scheme.
//!
//! # Module Overview
//!
//! - [`session`] - Per-run state, capture cache, and upload dispatch
//! - [`protocol`] - Protocol handler registry and the payload contract
//! - [`driver`] - The screenshot capture seam
//! - [`https`] - Reference HTTPS transport
//! - [`config`] - Configuration and target identity structures
//! - [`error`] - Crate error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use narcis_webdriver::{
//!     Authentication, Config, HttpsProtocol, Platform, Session, TargetIdentity,
//! };
//!
//! # async fn example(driver: std::sync::Arc<dyn narcis_webdriver::Driver>) -> narcis_webdriver::Result<()> {
//! HttpsProtocol::register_default()?;
//!
//! let config = Config::new("https://narcis.server.example/project-name")
//!     .with_authentication(Authentication::new("user", "secret"));
//! let target = TargetIdentity::new(
//!     Platform::new("iPhone 6 portrait", "OS X 10.10", "iphone 9.0"),
//!     "master",
//!     "0000000",
//! );
//!
//! let mut session = Session::new(config, target);
//! session.attach_driver(driver);
//! session.capture("landing-page").await?;
//! session.capture("checkout").await?;
//! let response = session.upload().await?;
//! # let _ = response;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod https;
pub mod protocol;
pub mod session;

pub use config::{Authentication, Config, Platform, TargetIdentity};
pub use driver::Driver;
pub use error::{ErrorCategory, ErrorPayload, NarcisError, Result};
pub use https::HttpsProtocol;
pub use protocol::{Payload, ProtocolHandler, ProtocolRegistry};
pub use session::Session;
