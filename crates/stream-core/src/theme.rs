// File: crates/stream-core/src/theme.rs
// Summary: Chrome colors (background, axes, legend text, tooltip) and per-series color assignment.

use crate::types::Rgba;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Rgba,
    pub axis_line: Rgba,
    pub axis_label: Rgba,
    pub legend_label: Rgba,
    pub tooltip_background: Rgba,
    pub tooltip_border: Rgba,
    pub tooltip_shadow: Rgba,
    /// Font sizes in pixels.
    pub axis_font_size: f32,
    pub legend_font_size: f32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: Rgba::WHITE,
            axis_line: Rgba::BLACK,
            axis_label: Rgba::BLACK,
            legend_label: Rgba::BLACK,
            tooltip_background: Rgba::WHITE,
            tooltip_border: Rgba::rgb(0xcc, 0xcc, 0xcc),
            tooltip_shadow: Rgba::BLACK.with_alpha(26), // rgba(0,0,0,0.1)
            axis_font_size: 10.0,
            legend_font_size: 14.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Rgba::rgb(18, 18, 20),
            axis_line: Rgba::rgb(180, 180, 190),
            axis_label: Rgba::rgb(235, 235, 245),
            legend_label: Rgba::rgb(235, 235, 245),
            tooltip_background: Rgba::rgb(32, 32, 36),
            tooltip_border: Rgba::rgb(70, 70, 78),
            tooltip_shadow: Rgba::BLACK.with_alpha(80),
            axis_font_size: 10.0,
            legend_font_size: 14.0,
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Self::light() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::light()
}

/// Ordinal key → color mapping. Depends only on key order and the palette;
/// keys past the palette length reuse it cyclically.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorAssignment {
    entries: Vec<(String, Rgba)>,
}

impl ColorAssignment {
    pub fn new(keys: &[String], palette: &[Rgba]) -> Self {
        let entries = keys
            .iter()
            .enumerate()
            .map(|(i, k)| {
                let c = if palette.is_empty() { Rgba::BLACK } else { palette[i % palette.len()] };
                (k.clone(), c)
            })
            .collect();
        Self { entries }
    }

    pub fn color(&self, key: &str) -> Option<Rgba> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, c)| *c)
    }

    pub fn color_at(&self, index: usize) -> Option<Rgba> {
        self.entries.get(index).map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgba)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ks: &[&str]) -> Vec<String> {
        ks.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn assignment_follows_key_order() {
        let pal = [Rgba::rgb(1, 0, 0), Rgba::rgb(0, 1, 0)];
        let a = ColorAssignment::new(&keys(&["x", "y", "z"]), &pal);
        assert_eq!(a.color("x"), Some(pal[0]));
        assert_eq!(a.color("y"), Some(pal[1]));
        assert_eq!(a.color("z"), Some(pal[0]));
        assert_eq!(a.color("w"), None);
        assert_eq!(a, ColorAssignment::new(&keys(&["x", "y", "z"]), &pal));
    }

    #[test]
    fn find_theme_by_name() {
        assert_eq!(find("DARK").name, "dark");
        assert_eq!(find("nope").name, "light");
    }

    #[test]
    fn tooltip_shadow_is_translucent_black() {
        let s = Theme::light().tooltip_shadow;
        assert_eq!((s.r, s.g, s.b, s.a), (0, 0, 0, 26));
        assert!(Theme::dark().tooltip_shadow.opacity() > s.opacity());
    }
}
