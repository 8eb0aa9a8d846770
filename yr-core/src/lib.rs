//! Client library for yr.no place forecasts.
//!
//! This crate defines:
//! - Place URL parsing and language variants
//! - A TTL-bounded disk cache in front of the HTTP fetch
//! - Parsing of `varsel.xml` into typed forecast data
//! - Day-grouped HTML table rendering with nb/nn/en labels
//!
//! It is used by `yr-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod i18n;
pub mod location;
pub mod model;
pub mod render;
pub mod transport;

pub use cache::DocumentCache;
pub use client::YrClient;
pub use config::{ClientOptions, Config};
pub use error::{Result, YrError};
pub use i18n::translate;
pub use location::{Language, LocationSpec};
pub use model::{ForecastEntry, WeatherReport};
pub use render::{DayGroup, TableStyle, group_by_day, render_table};
pub use transport::{HttpTransport, Transport};
