//! # Flaretion - crypto signal dashboard in the terminal
//!
//! A terminal dashboard for a trading-signal backend: market overview,
//! trading signals, strategies, RSI/market-regime analysis and account
//! settings. Built with ratatui and reqwest.
//!
//! ## Architecture
//!
//! - **API**: HTTP client for the backend's read-only endpoints
//! - **Source**: live or mock provider of screen data
//! - **State**: centralized store; reducers return the fetches they need
//! - **Loader**: runs fetches on tokio tasks and reports back as actions
//! - **UI**: layout and rendering logic
//! - **Events**: input handling and key bindings
//! - **Config**: layered configuration

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod loader;
pub mod source;
pub mod state;
pub mod ui;

pub use api::{ApiClient, ApiClientBuilder};
pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use source::{DataSource, DataSourceKind};
