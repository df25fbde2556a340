use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::assets::decode::PreparedImage;
use crate::assets::fonts::FontBook;
use crate::assets::logo::{DEFAULT_LOGO_TIMEOUT, DEFAULT_MAX_LOGO_BYTES, LogoFetcher};
use crate::foundation::error::{OgError, OgResult};
use crate::render::{RenderedCard, render_card};
use crate::scene::render_spec::{Interpreter, MAX_DIMENSION, RenderSpec};

/// Engine construction options.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    /// Timeout for one logo fetch.
    pub logo_timeout: Duration,
    /// Largest accepted logo body.
    pub max_logo_bytes: usize,
    /// Upper bound for `width` and `height`.
    pub max_dimension: u32,
    /// Font file used instead of system discovery.
    pub font_path: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            logo_timeout: DEFAULT_LOGO_TIMEOUT,
            max_logo_bytes: DEFAULT_MAX_LOGO_BYTES,
            max_dimension: MAX_DIMENSION,
            font_path: None,
        }
    }
}

/// Stateless card renderer shared across requests.
///
/// Holds only read-only state: the font book, the logo HTTP client and the interpreter bounds.
#[derive(Clone, Debug)]
pub struct OgEngine {
    fonts: Arc<FontBook>,
    fetcher: LogoFetcher,
    interpreter: Interpreter,
}

impl OgEngine {
    /// Build an engine, resolving fonts from `settings.font_path` or the system.
    pub fn new(settings: EngineSettings) -> OgResult<Self> {
        let fonts = match &settings.font_path {
            Some(path) => FontBook::from_file(path)?,
            None => FontBook::system(),
        };
        Self::with_fonts(settings, fonts)
    }

    /// Build an engine around an already loaded font book.
    pub fn with_fonts(settings: EngineSettings, fonts: FontBook) -> OgResult<Self> {
        if fonts.is_empty() {
            tracing::warn!("no usable font faces found; text will not be rendered");
        } else {
            tracing::info!(family = fonts.family().unwrap_or_default(), "fonts loaded");
        }
        let fetcher =
            LogoFetcher::new(settings.logo_timeout)?.with_max_bytes(settings.max_logo_bytes);
        Ok(Self {
            fonts: Arc::new(fonts),
            fetcher,
            interpreter: Interpreter::new(settings.max_dimension),
        })
    }

    /// The fonts used for text.
    pub(crate) fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// The request interpreter configured with this engine's dimension bound.
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Interpret a raw query string.
    pub fn interpret_query(&self, query: &str) -> RenderSpec {
        self.interpreter.interpret_query(query)
    }

    /// Render `spec` to pixels. A missing or broken logo is omitted.
    #[tracing::instrument(level = "debug", skip_all, fields(w = spec.width, h = spec.height, pattern = %spec.pattern))]
    pub async fn render(&self, spec: &RenderSpec) -> OgResult<RenderedCard> {
        let logo = self.fetch_logo(spec).await;
        let fonts = Arc::clone(&self.fonts);
        let spec = spec.clone();
        run_blocking(move || render_card(&spec, logo.as_ref(), &fonts)).await
    }

    /// Render `spec` and encode it as PNG.
    #[tracing::instrument(level = "debug", skip_all, fields(w = spec.width, h = spec.height, pattern = %spec.pattern))]
    pub async fn render_png(&self, spec: &RenderSpec) -> OgResult<Vec<u8>> {
        let logo = self.fetch_logo(spec).await;
        let fonts = Arc::clone(&self.fonts);
        let spec = spec.clone();
        let started = std::time::Instant::now();
        let png = run_blocking(move || {
            render_card(&spec, logo.as_ref(), &fonts).and_then(|card| card.encode_png())
        })
        .await?;
        tracing::debug!(
            bytes = png.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "card rendered"
        );
        Ok(png)
    }

    async fn fetch_logo(&self, spec: &RenderSpec) -> Option<PreparedImage> {
        match &spec.logo_url {
            Some(src) => self.fetcher.load(src).await,
            None => None,
        }
    }
}

async fn run_blocking<T, F>(f: F) -> OgResult<T>
where
    F: FnOnce() -> OgResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| OgError::render(format!("render task failed: {e}")))?
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
