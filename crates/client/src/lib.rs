//! HTTP client for the gengtu image-generation service.
//!
//! Provides the raw REST wrapper ([`api::GengtuApi`]), the three page
//! components (session gate, history cache, generation controller) that
//! drive a shared [`store::Store`], and the [`page::GeneratorPage`]
//! facade that wires them together for one generator page.

pub mod api;
pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod navigator;
pub mod page;
pub mod session;
pub mod store;

pub use config::ClientConfig;
pub use error::ClientError;
pub use page::GeneratorPage;
