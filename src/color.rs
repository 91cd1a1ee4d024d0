//! Color types and the categorical palette.
//!
//! Provides the RGBA color representation used throughout scene output, plus
//! the mapping from category labels to series colors.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f32::from(self.r) * inv_t + f32::from(other.r) * t) as u8,
            (f32::from(self.g) * inv_t + f32::from(other.g) * t) as u8,
            (f32::from(self.b) * inv_t + f32::from(other.b) * t) as u8,
            (f32::from(self.a) * inv_t + f32::from(other.a) * t) as u8,
        )
    }

    /// Hex representation (`#rrggbb`) for markup output.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Default categorical series palette.
pub const PALETTE: [Rgba; 8] = [
    Rgba::rgb(66, 133, 244),
    Rgba::rgb(219, 68, 55),
    Rgba::rgb(15, 157, 88),
    Rgba::rgb(244, 180, 0),
    Rgba::rgb(171, 71, 188),
    Rgba::rgb(0, 172, 193),
    Rgba::rgb(255, 112, 67),
    Rgba::rgb(93, 109, 126),
];

/// Mapping from category labels to series colors.
///
/// Labels are assigned palette entries in first-seen order; the palette cycles
/// when there are more labels than entries.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    entries: Vec<(String, Rgba)>,
    fallback: Rgba,
}

impl ColorMap {
    /// Assign palette colors to labels in order.
    #[must_use]
    pub fn from_labels(labels: &[String], palette: &[Rgba], fallback: Rgba) -> Self {
        let entries = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let color =
                    if palette.is_empty() { fallback } else { palette[i % palette.len()] };
                (label.clone(), color)
            })
            .collect();
        Self { entries, fallback }
    }

    /// Look up a label's color, falling back to the default series color.
    #[must_use]
    pub fn get(&self, label: &str) -> Rgba {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map_or(self.fallback, |(_, c)| *c)
    }

    /// Color for an unkeyed (single-series) group.
    #[must_use]
    pub fn fallback(&self) -> Rgba {
        self.fallback
    }

    /// Labels in assignment order, with their colors.
    #[must_use]
    pub fn entries(&self) -> &[(String, Rgba)] {
        &self.entries
    }

    /// True when no labels were assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_new() {
        let c = Rgba::new(10, 20, 30, 40);
        assert_eq!((c.r, c.g, c.b, c.a), (10, 20, 30, 40));
    }

    #[test]
    fn test_rgba_rgb_opaque() {
        let c = Rgba::rgb(1, 2, 3);
        assert_eq!(c.a, 255);
    }

    #[test]
    fn test_rgba_with_alpha() {
        let c = Rgba::RED.with_alpha(128);
        assert_eq!(c.a, 128);
        assert_eq!(c.r, 255);
    }

    #[test]
    fn test_rgba_lerp_midpoint() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert!(mid.r > 100 && mid.r < 150);
    }

    #[test]
    fn test_rgba_lerp_clamps() {
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, -1.0), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 2.0), Rgba::WHITE);
    }

    #[test]
    fn test_rgba_to_hex() {
        assert_eq!(Rgba::rgb(255, 0, 16).to_hex(), "#ff0010");
    }

    #[test]
    fn test_color_map_assignment_order() {
        let labels = vec!["a".to_string(), "b".to_string()];
        let map = ColorMap::from_labels(&labels, &PALETTE, Rgba::BLACK);
        assert_eq!(map.get("a"), PALETTE[0]);
        assert_eq!(map.get("b"), PALETTE[1]);
    }

    #[test]
    fn test_color_map_cycles_palette() {
        let labels: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
        let map = ColorMap::from_labels(&labels, &PALETTE, Rgba::BLACK);
        assert_eq!(map.get("c8"), PALETTE[0]);
    }

    #[test]
    fn test_color_map_fallback() {
        let map = ColorMap::from_labels(&[], &PALETTE, Rgba::GREEN);
        assert_eq!(map.get("missing"), Rgba::GREEN);
        assert_eq!(map.fallback(), Rgba::GREEN);
        assert!(map.is_empty());
    }
}
