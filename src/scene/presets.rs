//! Named color presets offered to clients.

use crate::scene::render_spec::RenderSpec;

/// A named background/text/accent color triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Display name.
    pub name: &'static str,
    /// `bg` value.
    pub background: &'static str,
    /// `text` value.
    pub text: &'static str,
    /// `accent` value.
    pub accent: &'static str,
}

/// Built-in presets, in display order.
pub const PRESETS: [Preset; 6] = [
    Preset {
        name: "Dark Blue",
        background: "#0f172a",
        text: "#ffffff",
        accent: "#3b82f6",
    },
    Preset {
        name: "Dark Purple",
        background: "#1e1b4b",
        text: "#ffffff",
        accent: "#a855f7",
    },
    Preset {
        name: "Dark Green",
        background: "#022c22",
        text: "#ffffff",
        accent: "#10b981",
    },
    Preset {
        name: "Light",
        background: "#ffffff",
        text: "#0f172a",
        accent: "#3b82f6",
    },
    Preset {
        name: "Warm",
        background: "#1c1917",
        text: "#fafaf9",
        accent: "#f97316",
    },
    Preset {
        name: "Pink",
        background: "#0f172a",
        text: "#ffffff",
        accent: "#ec4899",
    },
];

impl Preset {
    /// Find a preset by display name or slug (`dark-blue`), ignoring case.
    pub fn find(name: &str) -> Option<&'static Preset> {
        let wanted = slug(name);
        PRESETS.iter().find(|p| slug(p.name) == wanted)
    }

    /// Overwrite the color fields of `spec`.
    pub fn apply(&self, spec: &mut RenderSpec) {
        spec.background_color = self.background.to_string();
        spec.text_color = self.text.to_string();
        spec.accent_color = self.accent.to_string();
    }
}

fn slug(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| {
            if c == ' ' || c == '_' {
                '-'
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/presets.rs"]
mod tests;
