use std::time::Duration;

use base64::Engine as _;

use crate::assets::decode::{PreparedImage, decode_logo};
use crate::foundation::error::{OgError, OgResult};

/// Edge length the logo is drawn at, in pixels.
pub const LOGO_SIZE: u32 = 48;

/// Default per-fetch timeout.
pub const DEFAULT_LOGO_TIMEOUT: Duration = Duration::from_secs(3);

/// Largest logo body accepted, in bytes.
pub const DEFAULT_MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// Resolves `logo` parameters to decoded pixels.
///
/// One attempt per render, bounded by a timeout and a body size cap. Failures are reported to the
/// caller as errors by [`LogoFetcher::fetch`] and swallowed by [`LogoFetcher::load`].
#[derive(Clone, Debug)]
pub struct LogoFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl LogoFetcher {
    /// Build a fetcher with the given request timeout.
    pub fn new(timeout: Duration) -> OgResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ogcard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| OgError::fetch(format!("build http client: {e}")))?;
        Ok(Self {
            client,
            max_bytes: DEFAULT_MAX_LOGO_BYTES,
        })
    }

    /// Override the maximum accepted body size.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Fetch the raw bytes behind `src` (`http`, `https` or `data:`).
    pub async fn fetch(&self, src: &str) -> OgResult<Vec<u8>> {
        let src = src.trim();
        if src.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:")) {
            let bytes = decode_data_uri(src)?;
            return self.check_len(bytes);
        }

        let url = url::Url::parse(src).map_err(|e| OgError::fetch(format!("invalid url: {e}")))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(OgError::fetch(format!("unsupported scheme \"{other}\"")));
            }
        }

        let mut resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| OgError::fetch(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(OgError::fetch(format!("status {}", resp.status())));
        }
        if let Some(len) = resp.content_length()
            && len > self.max_bytes as u64
        {
            return Err(OgError::fetch(format!(
                "body of {len} bytes exceeds {} bytes",
                self.max_bytes
            )));
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| OgError::fetch(e.to_string()))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(OgError::fetch(format!(
                    "body exceeds {} bytes",
                    self.max_bytes
                )));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    /// Fetch and decode `src` at [`LOGO_SIZE`], returning `None` on any failure.
    #[tracing::instrument(level = "debug", skip(self))]
    pub(crate) async fn load(&self, src: &str) -> Option<PreparedImage> {
        let bytes = match self.fetch(src).await {
            Ok(b) => b,
            Err(err) => {
                tracing::warn!(%err, "logo unavailable; omitting");
                return None;
            }
        };
        match decode_logo(&bytes, LOGO_SIZE) {
            Ok(img) => Some(img),
            Err(err) => {
                tracing::warn!(%err, bytes = bytes.len(), "logo undecodable; omitting");
                None
            }
        }
    }

    fn check_len(&self, bytes: Vec<u8>) -> OgResult<Vec<u8>> {
        if bytes.len() > self.max_bytes {
            return Err(OgError::fetch(format!(
                "body exceeds {} bytes",
                self.max_bytes
            )));
        }
        Ok(bytes)
    }
}

/// Decode `data:[<mediatype>][;base64],<payload>`.
pub(crate) fn decode_data_uri(src: &str) -> OgResult<Vec<u8>> {
    let (meta, payload) = src
        .get(5..)
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| OgError::fetch("data uri has no payload separator"))?;

    let is_base64 = meta
        .rsplit(';')
        .next()
        .is_some_and(|p| p.trim().eq_ignore_ascii_case("base64"));

    let raw: Vec<u8> = percent_encoding::percent_decode_str(payload).collect();
    if is_base64 {
        let cleaned: Vec<u8> = raw
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        base64::engine::general_purpose::STANDARD
            .decode(&cleaned)
            .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(&cleaned))
            .map_err(|e| OgError::fetch(format!("data uri base64: {e}")))
    } else {
        Ok(raw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/logo.rs"]
mod tests;
