//! Runtime half of the raidloot server bridge.
//!
//! `raidloot-app` defines what the application needs from a server;
//! this crate provides the implementation that actually talks to one:
//!
//! - [`ClientConfig`] resolves the base URL and timeout, with an
//!   environment override for pointing at a non-default backend;
//! - [`TokenStore`] keeps the bearer token on disk between runs;
//! - [`HttpServerBridge`] implements the bridge over reqwest, turning
//!   HTTP failures into the error taxonomy the application layer reacts
//!   to.
//!
//! A frontend wires it up once at startup:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use raidloot_app::AppCore;
//! use raidloot_client::{ClientConfig, HttpServerBridge};
//!
//! # async fn start() -> Result<(), raidloot_app::AppError> {
//! let bridge = HttpServerBridge::new(ClientConfig::from_env())?;
//! let core = AppCore::new(Arc::new(bridge));
//! core.start().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod http;
pub mod token;

pub use config::{ClientConfig, API_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use http::HttpServerBridge;
pub use token::{TokenStore, TokenStoreError};
