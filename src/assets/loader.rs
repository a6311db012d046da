use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    time::Duration,
};

use base64::Engine as _;

use crate::{
    assets::bitmap::Bitmap,
    assets::decode::decode_image,
    foundation::error::{IngotError, IngotResult},
};

/// Where an image comes from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImageRef {
    /// `http://` or `https://` URL on an untrusted third-party host.
    Url(String),
    /// Inline `data:` URL.
    DataUrl(String),
    /// Local filesystem path (also accepted as `file://...`).
    Path(PathBuf),
}

impl ImageRef {
    /// Classify a user-supplied reference string.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        let lower = t.get(..8).unwrap_or(t).to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(t.to_string())
        } else if lower.starts_with("data:") {
            Self::DataUrl(t.to_string())
        } else if lower.starts_with("file://") {
            Self::Path(PathBuf::from(&t["file://".len()..]))
        } else {
            Self::Path(PathBuf::from(t))
        }
    }

    fn cache_key(&self) -> u64 {
        let (tag, s): (u8, std::borrow::Cow<'_, str>) = match self {
            Self::Url(u) => (b'U', u.as_str().into()),
            Self::DataUrl(d) => (b'D', d.as_str().into()),
            Self::Path(p) => (b'P', p.to_string_lossy()),
        };
        let mut h = xxhash_rust::xxh3::Xxh3::new();
        h.update(&[tag]);
        h.update(s.as_bytes());
        h.digest()
    }

    /// Short human-readable description for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(u) => u.clone(),
            Self::DataUrl(d) => format!("data URL ({} bytes)", d.len()),
            Self::Path(p) => p.display().to_string(),
        }
    }
}

impl std::str::FromStr for ImageRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Image loader options.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoaderOpts {
    /// Upper bound on fetching and reading one image, in milliseconds.
    pub timeout_ms: u64,
    /// Keep decoded bitmaps per URL or path to avoid refetching. `data:` URLs are never cached.
    pub cache: bool,
    /// Most recently used bitmaps kept when `cache` is on.
    pub cache_capacity: usize,
    /// `User-Agent` header sent to remote hosts.
    pub user_agent: String,
}

impl Default for LoaderOpts {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            cache: true,
            cache_capacity: 16,
            user_agent: concat!("ingot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Resolves [`ImageRef`]s into decoded [`Bitmap`]s.
///
/// Remote hosts are treated as anonymous third parties: no cookies or credentials are sent.
/// Loads never retry on their own.
pub struct ImageLoader {
    client: reqwest::Client,
    opts: LoaderOpts,
    cache: tokio::sync::Mutex<BitmapCache>,
}

struct BitmapCache {
    entries: HashMap<u64, Bitmap>,
    lru: VecDeque<u64>,
    capacity: usize,
}

impl BitmapCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity,
        }
    }

    fn get(&mut self, key: u64) -> Option<Bitmap> {
        let hit = self.entries.get(&key).cloned()?;
        self.touch(key);
        Some(hit)
    }

    fn insert(&mut self, key: u64, bitmap: Bitmap) {
        self.entries.insert(key, bitmap);
        self.touch(key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.entries.remove(&old);
            }
        }
    }

    fn touch(&mut self, key: u64) {
        if let Some(pos) = self.lru.iter().position(|k| *k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }
}

impl ImageLoader {
    /// Build a loader with its own HTTP client.
    pub fn new(opts: LoaderOpts) -> IngotResult<Self> {
        if opts.timeout_ms == 0 {
            return Err(IngotError::validation("loader timeout_ms must be > 0"));
        }
        if opts.cache && opts.cache_capacity == 0 {
            return Err(IngotError::validation("loader cache_capacity must be > 0"));
        }
        let client = reqwest::Client::builder()
            .user_agent(opts.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| IngotError::validation(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            cache: tokio::sync::Mutex::new(BitmapCache::new(opts.cache_capacity)),
            opts,
        })
    }

    /// Loader options in effect.
    pub fn opts(&self) -> &LoaderOpts {
        &self.opts
    }

    /// Resolve one reference, bounded by the configured timeout.
    #[tracing::instrument(skip(self, source), fields(source = %source.describe()))]
    pub async fn load(&self, source: &ImageRef) -> IngotResult<Bitmap> {
        let key = source.cache_key();
        let cacheable = self.opts.cache && !matches!(source, ImageRef::DataUrl(_));
        if cacheable && let Some(hit) = self.cache.lock().await.get(key) {
            tracing::debug!("image cache hit");
            return Ok(hit);
        }

        let limit = Duration::from_millis(self.opts.timeout_ms);
        let bytes = match tokio::time::timeout(limit, self.fetch_bytes(source)).await {
            Ok(res) => res,
            Err(_) => Err(IngotError::Timeout(self.opts.timeout_ms)),
        };
        let bitmap = bytes.and_then(|b| decode_image(&b));
        match &bitmap {
            Ok(b) => {
                tracing::debug!(width = b.width, height = b.height, "image loaded");
                if cacheable {
                    self.cache.lock().await.insert(key, b.clone());
                }
            }
            Err(e) => tracing::warn!(error = %e, "image load failed"),
        }
        bitmap
    }

    /// Resolve base and optional logo concurrently. Neither load waits on the other.
    pub async fn load_pair(
        &self,
        base: &ImageRef,
        logo: Option<&ImageRef>,
    ) -> (IngotResult<Bitmap>, Option<IngotResult<Bitmap>>) {
        let logo_fut = async {
            match logo {
                Some(l) => Some(self.load(l).await),
                None => None,
            }
        };
        tokio::join!(self.load(base), logo_fut)
    }

    /// Number of cached bitmaps.
    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Drop every cached bitmap.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn fetch_bytes(&self, source: &ImageRef) -> IngotResult<Vec<u8>> {
        match source {
            ImageRef::Url(url) => self.fetch_http(url).await,
            ImageRef::DataUrl(d) => decode_data_url(d),
            ImageRef::Path(p) => read_file(p).await,
        }
    }

    async fn fetch_http(&self, url: &str) -> IngotResult<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| IngotError::network(format!("request to {url} failed: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(IngotError::network(format!(
                "{url} answered with HTTP {}",
                status.as_u16()
            )));
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| IngotError::network(format!("reading body of {url} failed: {e}")))?;
        Ok(body.to_vec())
    }
}

async fn read_file(path: &Path) -> IngotResult<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| IngotError::network(format!("failed to read '{}': {e}", path.display())))
}

/// Decode the payload of a `data:[<mediatype>][;base64],<data>` URL.
pub(crate) fn decode_data_url(s: &str) -> IngotResult<Vec<u8>> {
    let rest = s
        .get(..5)
        .filter(|p| p.eq_ignore_ascii_case("data:"))
        .map(|_| &s[5..])
        .ok_or_else(|| IngotError::decode("data URL must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| IngotError::decode("data URL has no ',' separator"))?;
    let is_base64 = meta
        .rsplit(';')
        .next()
        .is_some_and(|p| p.eq_ignore_ascii_case("base64"));

    if is_base64 {
        let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| IngotError::decode(format!("data URL base64 payload: {e}")))
    } else {
        Ok(percent_encoding::percent_decode_str(payload).collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
