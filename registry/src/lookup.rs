//! Dropdown data loaders (levels, cities).
//!
//! A [`Lookup`] mirrors what a form needs to render a select box: the items,
//! whether a fetch is in flight, and the last error message. Failures empty
//! the list rather than leaving stale entries selectable.

use serde::de::DeserializeOwned;

use crate::api::ApiClient;
use crate::endpoints::{CITIES_PATH, LEVELS_PATH};
use crate::types::{City, Level};

#[derive(Clone, Debug, PartialEq)]
pub struct Lookup<T> {
    path: &'static str,
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T: DeserializeOwned> Lookup<T> {
    /// A lookup that has not fetched yet. It starts out loading so forms
    /// show a spinner rather than an empty select on first render.
    #[must_use]
    pub fn new(path: &'static str) -> Self {
        Self { path, items: Vec::new(), loading: true, error: None }
    }

    #[must_use]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Fetch (or re-fetch) the items.
    pub async fn refetch(&mut self, api: &ApiClient) {
        self.loading = true;
        self.error = None;
        match api.get_json::<Vec<T>>(self.path).await {
            Ok(items) => self.items = items,
            Err(err) => {
                tracing::warn!(path = self.path, error = %err, "lookup fetch failed");
                self.error = Some(err.to_string());
                self.items.clear();
            }
        }
        self.loading = false;
    }
}

impl Lookup<Level> {
    #[must_use]
    pub fn levels() -> Self {
        Self::new(LEVELS_PATH)
    }
}

impl Lookup<City> {
    #[must_use]
    pub fn cities() -> Self {
        Self::new(CITIES_PATH)
    }
}

/// Fetch the level list into a fresh lookup.
pub async fn load_levels(api: &ApiClient) -> Lookup<Level> {
    let mut lookup = Lookup::levels();
    lookup.refetch(api).await;
    lookup
}

/// Fetch the city list into a fresh lookup.
pub async fn load_cities(api: &ApiClient) -> Lookup<City> {
    let mut lookup = Lookup::cities();
    lookup.refetch(api).await;
    lookup
}

#[cfg(test)]
#[path = "lookup_test.rs"]
mod tests;
