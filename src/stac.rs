//! Serde types for the slice of the STAC API this crate consumes.
//!
//! Deserialization is deliberately lenient: missing `features`, `links` or
//! `assets` collapse to empty collections rather than errors, matching how
//! the upstream catalogue omits keys it has nothing to say about.

use std::collections::BTreeMap;

/// Media type the upstream catalogue declares on its Parquet assets.
pub const PARQUET_MEDIA_TYPE: &str = "application/vnd.apache.parquet";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Link {
    #[serde(default)]
    pub rel: Option<String>,
    pub href: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Asset {
    pub href: String,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
}

impl Asset {
    pub fn is_parquet(&self) -> bool {
        self.media_type.as_deref() == Some(PARQUET_MEDIA_TYPE)
    }
}

/// One STAC feature. Only the fields the pipeline touches are kept.
///
/// Assets are held in a `BTreeMap` so iteration (and therefore download
/// order and log output) is deterministic.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
}

/// One page of `/collections/{id}/items`.
#[derive(Debug, serde::Deserialize)]
pub struct ItemCollection {
    #[serde(default)]
    pub features: Vec<Item>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl ItemCollection {
    /// The href of the `rel == "next"` pagination link, if any.
    pub fn next_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel.as_deref() == Some("next"))
            .map(|l| l.href.as_str())
    }
}

// -- Tests -------------------------------------------------------------------
