//! Retrieves Swiss vegetation health index (VHI) time series from the
//! swisstopo STAC API and aggregates them into per-region daily timelines.
//!
//! The pipeline has four sequential stages:
//! paginate the collection's items, materialize the Parquet assets into a
//! local cache, rebuild per-category timeline tables in an embedded DuckDB
//! database, then export the tables as CSV.
//!
//! ## Quick start
//! - Configuration comes from `VHI_*` environment variables or a `.vhirc`
//!   file (supported in the current directory and in your home directory);
//!   every setting has a sensible default.
//! - Call the stage functions in order, or just run the `swisseo-vhi`
//!   binary.
//!
//! ```no_run
//! use swisseo_vhi::{Config, StacClient, build_timelines, export_timelines, materialize_assets};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = StacClient::new(&config.api_url)?;
//!
//!     let items = client.fetch_all_items(&config.collection)?;
//!     materialize_assets(&client, &items, &config.output_dir)?;
//!
//!     build_timelines(&config.output_dir, &config.database)?;
//!     export_timelines(&config.database, &config.output_dir)?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod cache;
mod classify;
mod client;
mod config;
mod error;
mod export;
mod stac;
mod timeline;
mod util;

pub use cache::materialize_assets;
pub use classify::{Category, VOLATILE_MARKER, classify, is_volatile};
pub use client::StacClient;
pub use config::{Config, DEFAULT_API_URL, DEFAULT_COLLECTION};
pub use error::{Error, Result};
pub use export::export_timelines;
pub use stac::{Asset, Item, ItemCollection, Link, PARQUET_MEDIA_TYPE};
pub use timeline::build_timelines;
