//! Bounded-wait loading of card images (photos and logos).

use crate::error::ImageLoadError;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use idcard_gen_raster::Bitmap;
use log::{error, info};
use reqwest::{Client, StatusCode};
use std::time::Duration;

static IDCARD_GEN_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Default bounded wait for a single image (the browser variants used 5-7 s).
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_millis(6000);

lazy_static! {
    static ref REQWEST_CLIENT: Client = reqwest::ClientBuilder::new()
        .user_agent(IDCARD_GEN_USER_AGENT)
        .build()
        .expect("Failed to construct reqwest client");
}

/// Loads an image source (data URI or remote URL) into a drawable bitmap.
///
/// Each call re-fetches and re-decodes; export is a rare, user-initiated,
/// one-shot operation, so nothing is cached. The whole fetch+decode races a
/// deadline: a source that never resolves fails with
/// [`ImageLoadError::Timeout`] no later than the configured timeout, and the
/// losing future is dropped along with its decode resources.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    timeout: Duration,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_TIMEOUT)
    }
}

impl ImageLoader {
    /// Create a loader with the given per-image timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The configured per-image timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve a source to a decoded bitmap within the bounded wait.
    pub async fn load(&self, source: &str) -> Result<Bitmap, ImageLoadError> {
        match tokio::time::timeout(self.timeout, fetch_and_decode(source)).await {
            Ok(result) => result,
            Err(_) => Err(ImageLoadError::Timeout {
                source_uri: summarize_source(source),
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}

async fn fetch_and_decode(source: &str) -> Result<Bitmap, ImageLoadError> {
    let bytes = if let Some(rest) = source.strip_prefix("data:") {
        decode_data_uri(rest)?
    } else if source.starts_with("http://") || source.starts_with("https://") {
        fetch_remote(source).await?
    } else {
        return Err(ImageLoadError::UnsupportedSource(summarize_source(source)));
    };

    Bitmap::decode(&bytes).map_err(|e| ImageLoadError::Decode(e.to_string()))
}

/// Decode the payload of a `data:<mediatype>;base64,<data>` URI.
fn decode_data_uri(rest: &str) -> Result<Vec<u8>, ImageLoadError> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageLoadError::Decode("malformed data URI".to_string()))?;

    if !meta.ends_with(";base64") {
        return Err(ImageLoadError::UnsupportedSource(
            "data URI without base64 encoding".to_string(),
        ));
    }

    BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageLoadError::Decode(format!("invalid base64 payload: {}", e)))
}

async fn fetch_remote(url: &str) -> Result<Vec<u8>, ImageLoadError> {
    info!("Resolving image: {url}");
    let response = REQWEST_CLIENT
        .get(url)
        .send()
        .await
        .map_err(|e| ImageLoadError::Fetch(e.to_string()))?;

    match response.status() {
        StatusCode::OK => response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ImageLoadError::Fetch(e.to_string())),
        status => {
            error!("Failed to load image from url {url} with status code {status:?}");
            Err(ImageLoadError::Fetch(format!(
                "unexpected status code {status}"
            )))
        }
    }
}

/// Keep error messages readable when the source is a long data URI.
fn summarize_source(source: &str) -> String {
    const MAX_LEN: usize = 64;
    if source.len() <= MAX_LEN {
        source.to_string()
    } else {
        let prefix: String = source.chars().take(MAX_LEN).collect();
        format!("{prefix}…")
    }
}
