use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::recipes::{Recipe, KNOWN_CATEGORIES};

pub const DEFAULT_RECIPE_URL: &str = "https://weilei.site/all_recipes.json";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 60;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 12;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 6;
const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 3600;
/// After a failed fetch, callers get stale or empty data without retrying
/// until this much time has passed.
const FAILED_FETCH_BACKOFF_SECS: i64 = 30;

/// Supplies the full recipe collection. Implementations never fail: an
/// unrecoverable problem yields an empty collection.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn all_recipes(&self) -> Arc<Vec<Recipe>>;
}

#[derive(Debug, Clone)]
pub struct CachedRecipes {
    pub data: Arc<Vec<Recipe>>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheInfo {
    pub has_cache: bool,
    pub cache_age_ms: i64,
}

/// Read-through cache in front of the remote recipe JSON.
pub struct RemoteRecipeStore {
    client: Client,
    url: String,
    ttl: chrono::Duration,
    fetch_timeout: Duration,
    cache: RwLock<Option<CachedRecipes>>,
    /// Held while fetching; records when the last fetch failed.
    refresh: Mutex<Option<DateTime<Utc>>>,
}

impl RemoteRecipeStore {
    pub fn new(url: impl Into<String>, ttl_secs: u64, fetch_timeout_secs: u64) -> Result<Self> {
        let fetch_timeout = Duration::from_secs(fetch_timeout_secs.max(1));
        let client = Client::builder()
            .user_agent(concat!("whattoeat/", env!("CARGO_PKG_VERSION")))
            .timeout(fetch_timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
            ttl: chrono::Duration::seconds(ttl_secs.min(MAX_CACHE_TTL_SECS) as i64),
            fetch_timeout,
            cache: RwLock::new(None),
            refresh: Mutex::new(None),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn clear_cache(&self) {
        *self.cache.write().await = None;
        *self.refresh.lock().await = None;
    }

    pub async fn cache_info(&self) -> CacheInfo {
        let guard = self.cache.read().await;
        match guard.as_ref() {
            Some(entry) => CacheInfo {
                has_cache: true,
                cache_age_ms: (Utc::now() - entry.fetched_at).num_milliseconds(),
            },
            None => CacheInfo {
                has_cache: false,
                cache_age_ms: 0,
            },
        }
    }

    async fn fresh_entry(&self) -> Option<Arc<Vec<Recipe>>> {
        let guard = self.cache.read().await;
        let entry = guard.as_ref()?;
        if Utc::now() - entry.fetched_at < self.ttl {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    async fn stale_or_empty(&self) -> Arc<Vec<Recipe>> {
        let guard = self.cache.read().await;
        match guard.as_ref() {
            Some(entry) => {
                warn!(
                    "serving stale recipes fetched at {}",
                    entry.fetched_at.to_rfc3339()
                );
                entry.data.clone()
            }
            None => Arc::new(Vec::new()),
        }
    }

    async fn fetch(&self) -> Result<Vec<Recipe>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("failed GET request: {}", self.url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed reading response body: {}", self.url))?;
        if !status.is_success() {
            let preview: String = body.chars().take(180).collect();
            return Err(anyhow!("GET {} returned {status}: {preview}", self.url));
        }
        decode_recipes(&body).with_context(|| format!("invalid recipe JSON: {}", self.url))
    }

    #[cfg(test)]
    pub(crate) async fn seed_cache(&self, data: Vec<Recipe>, fetched_at: DateTime<Utc>) {
        *self.cache.write().await = Some(CachedRecipes {
            data: Arc::new(data),
            fetched_at,
        });
    }
}

#[async_trait]
impl RecipeSource for RemoteRecipeStore {
    async fn all_recipes(&self) -> Arc<Vec<Recipe>> {
        if let Some(data) = self.fresh_entry().await {
            return data;
        }

        let mut last_failure = self.refresh.lock().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(data) = self.fresh_entry().await {
            return data;
        }
        if let Some(failed_at) = *last_failure {
            if Utc::now() - failed_at < chrono::Duration::seconds(FAILED_FETCH_BACKOFF_SECS) {
                debug!("recent recipe fetch failed, not retrying yet");
                return self.stale_or_empty().await;
            }
        }

        debug!("fetching recipes from {}", self.url);
        match tokio::time::timeout(self.fetch_timeout, self.fetch()).await {
            Ok(Ok(recipes)) => {
                info!("loaded {} recipes from {}", recipes.len(), self.url);
                flag_unknown_categories(&recipes);
                let data = Arc::new(recipes);
                *self.cache.write().await = Some(CachedRecipes {
                    data: data.clone(),
                    fetched_at: Utc::now(),
                });
                *last_failure = None;
                data
            }
            Ok(Err(error)) => {
                warn!("error fetching recipes: {error:#}");
                *last_failure = Some(Utc::now());
                self.stale_or_empty().await
            }
            Err(_) => {
                warn!(
                    "recipe fetch timed out after {}s",
                    self.fetch_timeout.as_secs()
                );
                *last_failure = Some(Utc::now());
                self.stale_or_empty().await
            }
        }
    }
}

/// Fixed in-memory collection, used for tests and local dataset files.
#[derive(Debug, Clone, Default)]
pub struct StaticRecipeStore {
    recipes: Arc<Vec<Recipe>>,
}

impl StaticRecipeStore {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Arc::new(recipes),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading recipes: {}", path.display()))?;
        let recipes = decode_recipes(&data)
            .with_context(|| format!("failed parsing recipes: {}", path.display()))?;
        flag_unknown_categories(&recipes);
        Ok(Self::new(recipes))
    }
}

#[async_trait]
impl RecipeSource for StaticRecipeStore {
    async fn all_recipes(&self) -> Arc<Vec<Recipe>> {
        self.recipes.clone()
    }
}

/// Decodes a dataset array record by record. Records that do not fit the
/// model are skipped; only a body that is not a JSON array is an error.
pub fn decode_recipes(body: &str) -> Result<Vec<Recipe>> {
    let records: Vec<Value> = serde_json::from_str(body)?;
    let total = records.len();
    let recipes = records
        .into_iter()
        .filter_map(|record| serde_json::from_value::<Recipe>(record).ok())
        .collect::<Vec<_>>();
    let skipped = total - recipes.len();
    if skipped > 0 {
        warn!("skipped {skipped} of {total} malformed recipe records");
    }
    Ok(recipes)
}

pub fn find_by_id<'a>(recipes: &'a [Recipe], id: &str) -> Option<&'a Recipe> {
    recipes.iter().find(|recipe| recipe.id == id)
}

/// Distinct categories in first-seen order.
pub fn categories(recipes: &[Recipe]) -> Vec<String> {
    first_seen(recipes.iter().map(|recipe| recipe.category.as_str()))
}

pub fn difficulties(recipes: &[Recipe]) -> Vec<u8> {
    recipes
        .iter()
        .map(|recipe| recipe.difficulty)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct tags in first-seen order.
pub fn tags(recipes: &[Recipe]) -> Vec<String> {
    first_seen(
        recipes
            .iter()
            .flat_map(|recipe| recipe.tags.iter().map(String::as_str)),
    )
}

pub fn unknown_categories(recipes: &[Recipe]) -> Vec<String> {
    categories(recipes)
        .into_iter()
        .filter(|category| !KNOWN_CATEGORIES.contains(&category.as_str()))
        .collect()
}

fn flag_unknown_categories(recipes: &[Recipe]) {
    let unknown = unknown_categories(recipes);
    if !unknown.is_empty() {
        warn!(
            "recipe dataset uses unrecognised categories: {}",
            unknown.join(", ")
        );
    }
}

fn first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}
