// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Deterministic color and marker assignment for chart series.
//!
//! Models are grouped by provider. Each provider has a fixed hue, models of
//! the same provider step through lightness levels, and every model gets a
//! point marker from a global running index. The assignment is a pure
//! function of the ordered `(model, provider)` list it is given.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Hue used for providers missing from [`PROVIDER_HUES`].
pub const DEFAULT_HUE: u16 = 0;

/// Base hue per known provider.
pub const PROVIDER_HUES: [(&str, u16); 5] = [
    ("openai", 120),
    ("azure", 210),
    ("anthropic", 280),
    ("gemini", 30),
    ("llama", 60),
];

const SATURATION: u8 = 70;
const BASE_LIGHTNESS: u8 = 40;
const LIGHTNESS_STEP: u8 = 10;
const LIGHTNESS_LEVELS: usize = 5;
const BACKGROUND_ALPHA: f32 = 0.2;

/// Base hue for a provider (case-insensitive).
pub fn provider_hue(provider: &str) -> u16 {
    PROVIDER_HUES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(provider.trim()))
        .map(|(_, hue)| *hue)
        .unwrap_or(DEFAULT_HUE)
}

/// A color in HSL space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HslColor {
    /// Hue in degrees.
    pub hue: u16,
    /// Saturation in percent.
    pub saturation: u8,
    /// Lightness in percent.
    pub lightness: u8,
}

impl HslColor {
    /// CSS `hsla(...)` with the given alpha.
    pub fn css_with_alpha(&self, alpha: f32) -> String {
        format!(
            "hsla({}, {}%, {}%, {})",
            self.hue, self.saturation, self.lightness, alpha
        )
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Point marker shapes, named as chart libraries spell them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointStyle {
    /// ●
    Circle,
    /// ▲
    Triangle,
    /// ■
    Rect,
    /// ★
    Star,
    /// +
    Cross,
    /// ×
    CrossRot,
    /// Rounded square.
    RectRounded,
    /// ◆ (rotated square).
    RectRot,
    /// Short dash.
    Dash,
    /// Line.
    Line,
    /// Diamond.
    Diamond,
}

/// Marker palette in assignment order.
pub const POINT_STYLES: [PointStyle; 11] = [
    PointStyle::Circle,
    PointStyle::Triangle,
    PointStyle::Rect,
    PointStyle::Star,
    PointStyle::Cross,
    PointStyle::CrossRot,
    PointStyle::RectRounded,
    PointStyle::RectRot,
    PointStyle::Dash,
    PointStyle::Line,
    PointStyle::Diamond,
];

impl PointStyle {
    /// Chart-library name of the marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Triangle => "triangle",
            Self::Rect => "rect",
            Self::Star => "star",
            Self::Cross => "cross",
            Self::CrossRot => "crossRot",
            Self::RectRounded => "rectRounded",
            Self::RectRot => "rectRot",
            Self::Dash => "dash",
            Self::Line => "line",
            Self::Diamond => "diamond",
        }
    }
}

impl fmt::Display for PointStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual encoding of one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesStyle {
    /// Line and marker color.
    pub color: HslColor,
    /// Marker shape.
    pub point_style: PointStyle,
}

impl SeriesStyle {
    /// Line color as CSS.
    pub fn border_color(&self) -> String {
        self.color.to_string()
    }

    /// Translucent fill color as CSS.
    pub fn background_color(&self) -> String {
        self.color.css_with_alpha(BACKGROUND_ALPHA)
    }
}

/// Assign a style to every model.
///
/// `models` is the ordered list of `(model key, provider)` pairs. Provider
/// groups are visited in order of their first model, and the marker index
/// runs across all groups.
pub fn assign_styles<'a, I>(models: I) -> HashMap<String, SeriesStyle>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut groups: Vec<(&'a str, Vec<&'a str>)> = Vec::new();
    for (model, provider) in models {
        match groups.iter_mut().find(|(p, _)| *p == provider) {
            Some((_, members)) => {
                if !members.contains(&model) {
                    members.push(model);
                }
            }
            None => groups.push((provider, vec![model])),
        }
    }

    let mut styles = HashMap::new();
    let mut style_index = 0usize;
    for (provider, members) in groups {
        let hue = provider_hue(provider);
        for (idx, model) in members.into_iter().enumerate() {
            let lightness = BASE_LIGHTNESS + (idx % LIGHTNESS_LEVELS) as u8 * LIGHTNESS_STEP;
            let style = SeriesStyle {
                color: HslColor {
                    hue,
                    saturation: SATURATION,
                    lightness,
                },
                point_style: POINT_STYLES[style_index % POINT_STYLES.len()],
            };
            styles.entry(model.to_string()).or_insert(style);
            style_index += 1;
        }
    }
    styles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_hues() {
        assert_eq!(provider_hue("openai"), 120);
        assert_eq!(provider_hue("Anthropic"), 280);
        assert_eq!(provider_hue("mistral"), DEFAULT_HUE);
        assert_eq!(provider_hue("default"), DEFAULT_HUE);
    }

    #[test]
    fn test_same_provider_varies_lightness() {
        let styles = assign_styles([("gpt4o", "openai"), ("gpt4o-mini", "openai")]);
        let a = styles["gpt4o"];
        let b = styles["gpt4o-mini"];
        assert_eq!(a.color.hue, b.color.hue);
        assert_eq!(a.color.lightness, 40);
        assert_eq!(b.color.lightness, 50);
        assert_ne!(a.point_style, b.point_style);
    }

    #[test]
    fn test_lightness_cycles_after_five() {
        let models: Vec<String> = (0..6).map(|i| format!("m{i}")).collect();
        let styles = assign_styles(models.iter().map(|m| (m.as_str(), "azure")));
        assert_eq!(styles["m4"].color.lightness, 80);
        assert_eq!(styles["m5"].color.lightness, 40);
    }

    #[test]
    fn test_markers_run_across_provider_groups() {
        // openai models are grouped together even though anthropic appears between them
        let styles = assign_styles([
            ("gpt4o", "openai"),
            ("sonnet", "anthropic"),
            ("gpt4o-mini", "openai"),
        ]);
        assert_eq!(styles["gpt4o"].point_style, PointStyle::Circle);
        assert_eq!(styles["gpt4o-mini"].point_style, PointStyle::Triangle);
        assert_eq!(styles["sonnet"].point_style, PointStyle::Rect);
        assert_eq!(styles["sonnet"].color.lightness, 40);
    }

    #[test]
    fn test_markers_unique_until_palette_exhausted() {
        let models: Vec<String> = (0..12).map(|i| format!("model-{i}")).collect();
        let styles = assign_styles(models.iter().map(|m| (m.as_str(), "openai")));
        let first_eleven: std::collections::HashSet<_> =
            models[..11].iter().map(|m| styles[m].point_style).collect();
        assert_eq!(first_eleven.len(), 11);
        assert_eq!(styles["model-11"].point_style, PointStyle::Circle);
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let input = [("a", "openai"), ("b", "gemini"), ("c", "llama"), ("d", "gemini")];
        assert_eq!(assign_styles(input), assign_styles(input));
    }

    #[test]
    fn test_css_rendering() {
        let style = assign_styles([("sonnet", "anthropic")])["sonnet"];
        assert_eq!(style.border_color(), "hsl(280, 70%, 40%)");
        assert_eq!(style.background_color(), "hsla(280, 70%, 40%, 0.2)");
        assert_eq!(style.point_style.to_string(), "circle");
    }
}
