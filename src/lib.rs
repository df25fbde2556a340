//! ogcard renders social preview ("Open Graph") cards on demand.
//!
//! A request's query parameters are interpreted into a [`RenderSpec`], laid out with a flexbox
//! solver, painted on the CPU and encoded as PNG:
//!
//! - [`Interpreter`] / [`RenderSpec::from_query`] turn parameters into a validated spec
//! - [`OgEngine`] fetches the optional logo and renders the card
//! - [`server::router`] exposes `GET /api/og` over HTTP
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
pub(crate) mod layout;
pub(crate) mod render;

pub mod config;
mod engine;
pub mod scene;
pub mod server;
pub mod telemetry;

pub use crate::assets::fonts::FontBook;
pub use crate::assets::logo::{
    DEFAULT_LOGO_TIMEOUT, DEFAULT_MAX_LOGO_BYTES, LOGO_SIZE, LogoFetcher,
};
pub use crate::engine::{EngineSettings, OgEngine};
pub use crate::foundation::core::Canvas;
pub use crate::foundation::error::{OgError, OgResult};
pub use crate::render::RenderedCard;
pub use crate::scene::presets::{PRESETS, Preset};
pub use crate::scene::render_spec::{Interpreter, Pattern, RenderSpec};
