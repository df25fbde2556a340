//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::engine::EngineSettings;
use crate::scene::presets::Preset;
use crate::scene::render_spec::{Interpreter, MAX_DIMENSION, RenderSpec};
use crate::server::{DEFAULT_CACHE_MAX_AGE, ServerSettings};

/// Command-line arguments for the `ogcard` binary.
#[derive(Debug, Parser)]
#[command(name = "ogcard", version, about = "On-demand Open Graph image generator")]
pub struct Cli {
    /// Log output format.
    #[arg(
        long = "log-format",
        env = "OGCARD_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Render one card to a PNG file.
    Render(RenderArgs),
    /// Print the image URL for a set of parameters.
    Url(UrlArgs),
    /// Print the color presets as JSON.
    Presets,
}

/// Log formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line output.
    Compact,
    /// One JSON object per event.
    Json,
}

/// Options shared by every command that renders.
#[derive(Debug, Args, Clone)]
pub struct EngineArgs {
    /// Logo fetch timeout in milliseconds.
    #[arg(long = "logo-timeout-ms", env = "OGCARD_LOGO_TIMEOUT_MS", default_value_t = 3000)]
    pub logo_timeout_ms: u64,

    /// Font file to use instead of system fonts.
    #[arg(long, env = "OGCARD_FONT", value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Largest accepted width/height; bigger values are clamped.
    #[arg(long = "max-dimension", env = "OGCARD_MAX_DIMENSION", default_value_t = MAX_DIMENSION)]
    pub max_dimension: u32,
}

impl EngineArgs {
    /// Engine settings described by these arguments.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            logo_timeout: Duration::from_millis(self.logo_timeout_ms),
            max_dimension: self.max_dimension,
            font_path: self.font.clone(),
            ..EngineSettings::default()
        }
    }
}

/// `ogcard serve`.
#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "OGCARD_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// `max-age` in seconds for image responses.
    #[arg(long = "cache-max-age", env = "OGCARD_CACHE_MAX_AGE", default_value_t = DEFAULT_CACHE_MAX_AGE)]
    pub cache_max_age: u64,

    /// Rendering options.
    #[command(flatten)]
    pub engine: EngineArgs,
}

impl ServeArgs {
    /// Server settings described by these arguments.
    pub fn server_settings(&self) -> ServerSettings {
        ServerSettings {
            bind: self.bind,
            cache_max_age: self.cache_max_age,
        }
    }
}

/// `ogcard render`.
#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Query string, as sent to `/api/og`.
    #[arg(long, default_value = "")]
    pub query: String,

    /// Output PNG path.
    #[arg(long)]
    pub out: PathBuf,

    /// Rendering options.
    #[command(flatten)]
    pub engine: EngineArgs,
}

/// `ogcard url`.
#[derive(Debug, Args, Clone)]
pub struct UrlArgs {
    /// Base URL of the server.
    #[arg(long, default_value = "http://localhost:3000")]
    pub base: String,

    /// Color preset name (e.g. `dark-purple`); explicit colors override it.
    #[arg(long)]
    pub preset: Option<String>,

    /// Headline.
    #[arg(long)]
    pub title: Option<String>,

    /// Secondary text; pass an empty string to omit it.
    #[arg(long)]
    pub description: Option<String>,

    /// Background color.
    #[arg(long)]
    pub bg: Option<String>,

    /// Text color.
    #[arg(long)]
    pub text: Option<String>,

    /// Accent color.
    #[arg(long)]
    pub accent: Option<String>,

    /// Background pattern: dots, grid, waves or none.
    #[arg(long)]
    pub pattern: Option<String>,

    /// Logo URL.
    #[arg(long)]
    pub logo: Option<String>,

    /// Author label.
    #[arg(long)]
    pub author: Option<String>,

    /// Width in pixels.
    #[arg(long)]
    pub width: Option<String>,

    /// Height in pixels.
    #[arg(long)]
    pub height: Option<String>,
}

impl UrlArgs {
    /// The card these arguments describe.
    pub fn to_spec(&self) -> anyhow::Result<RenderSpec> {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        let fields = [
            ("title", &self.title),
            ("description", &self.description),
            ("pattern", &self.pattern),
            ("logo", &self.logo),
            ("author", &self.author),
            ("width", &self.width),
            ("height", &self.height),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                pairs.push((name, v.as_str()));
            }
        }
        let mut spec = Interpreter::default().interpret_pairs(pairs);

        if let Some(name) = &self.preset {
            let preset =
                Preset::find(name).ok_or_else(|| anyhow::anyhow!("unknown preset \"{name}\""))?;
            preset.apply(&mut spec);
        }
        for (value, slot) in [
            (&self.bg, &mut spec.background_color),
            (&self.text, &mut spec.text_color),
            (&self.accent, &mut spec.accent_color),
        ] {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                *slot = v.to_string();
            }
        }
        Ok(spec)
    }

    /// Full image URL for these arguments.
    pub fn to_url(&self) -> anyhow::Result<url::Url> {
        let spec = self.to_spec()?;
        let mut url = url::Url::parse(&self.base)?.join("/api/og")?;
        url.set_query(Some(&spec.to_query_string()));
        Ok(url)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
