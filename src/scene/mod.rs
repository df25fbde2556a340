//! Request-side model: the card description and color presets.

pub mod presets;
pub mod render_spec;
