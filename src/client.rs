use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result, status_error};
use crate::stac::{Item, ItemCollection};

/// Page size requested from the items endpoint (the API's maximum).
const PAGE_LIMIT: usize = 100;

/// Blocking client for a STAC API.
///
/// The base URL is an explicit constructor input; the client holds no other
/// state beyond the shared HTTP connection pool.
#[derive(Debug, Clone)]
pub struct StacClient {
    base_url: String,
    page_size: usize,
    http: HttpClient,
}

impl StacClient {
    /// Creates a client for the given STAC API root.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("swisseo-vhi/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("swisseo-vhi")),
        );

        // No request timeout: the pipeline is fully sequential and relies on
        // the transport defaults.
        let http = HttpClient::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|source| Error::Request {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size: PAGE_LIMIT,
            http,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Runs a single-page query against `/collections/{id}/items`.
    ///
    /// `datetime` (an ISO 8601 range) and any extra parameters are merged
    /// into the query string; absent values are omitted. Extra parameters
    /// win on key collisions.
    pub fn query_collection(
        &self,
        collection_id: &str,
        datetime: Option<&str>,
        extra_params: Option<&BTreeMap<String, String>>,
    ) -> Result<Value> {
        let url = self.items_url(collection_id);

        let mut query = BTreeMap::new();
        if let Some(datetime) = datetime {
            query.insert("datetime".to_string(), datetime.to_string());
        }
        if let Some(extra) = extra_params {
            for (k, v) in extra {
                query.insert(k.clone(), v.clone());
            }
        }

        let query: Vec<(String, String)> = query.into_iter().collect();
        self.get_json(&url, &query)
    }

    /// Fetches every item of a collection, following `rel == "next"` links.
    ///
    /// The page-size parameter is only attached to the first request; a
    /// `next` href already embeds the pagination state and is followed
    /// verbatim. Visited URLs are tracked so a misbehaving API that cycles
    /// its links cannot loop the client forever.
    pub fn fetch_all_items(&self, collection_id: &str) -> Result<Vec<Item>> {
        let mut next_url = format!("{}?limit={}", self.items_url(collection_id), self.page_size);
        let mut all_items = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();

        loop {
            if !visited.insert(next_url.clone()) {
                eprintln!(
                    "Warning: pagination cycled back to {}, stopping",
                    next_url
                );
                break;
            }

            println!("Querying URL: {}", next_url);
            let page: ItemCollection = self.get_json(&next_url, &[])?;

            let next = page.next_link().map(str::to_string);
            all_items.extend(page.features);

            match next {
                Some(href) => next_url = href,
                None => break,
            }
        }

        Ok(all_items)
    }

    /// Downloads `url` in full and writes the body to `target`, overwriting
    /// any existing file. No retry: a failed transfer fails the call.
    ///
    /// The complete body is buffered before the target is touched. An
    /// interrupted transfer must leave nothing behind: a truncated file at
    /// the target path would be treated as cached on the next run and
    /// poison the aggregation.
    pub fn download(&self, url: &str, target: &Path) -> Result<()> {
        let resp = self.http.get(url).send().map_err(|source| Error::Request {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(status_error(status, url, &text));
        }

        let body = resp.bytes().map_err(|source| Error::Request {
            url: url.to_string(),
            source,
        })?;
        fs::write(target, &body).map_err(|source| Error::Storage {
            path: target.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    fn items_url(&self, collection_id: &str) -> String {
        format!("{}/collections/{}/items", self.base_url, collection_id)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(String, String)]) -> Result<T> {
        let mut req = self.http.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }

        let resp = req.send().map_err(|source| Error::Request {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        let final_url = resp.url().to_string();
        let text = resp.text().map_err(|source| Error::Request {
            url: final_url.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(status_error(status, &final_url, &text));
        }

        serde_json::from_str::<T>(&text).map_err(|source| Error::Malformed {
            url: final_url,
            source,
        })
    }
}

// -- Tests -------------------------------------------------------------------
