//! Theme configuration.
//!
//! Controls the non-data visual appearance of plots. A theme is an explicit
//! value threaded from the composer through panel rendering into mark drawing,
//! so panels stay pure functions of their inputs.

use crate::color::{Rgba, PALETTE};

/// Theme specification.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Canvas background color.
    pub background: Rgba,
    /// Panel background color.
    pub panel_background: Rgba,
    /// Grid line color.
    pub grid_color: Rgba,
    /// Axis line and tick label color.
    pub axis_color: Rgba,
    /// Text color for titles and strips.
    pub text_color: Rgba,
    /// Reference line/band color.
    pub annotation_color: Rgba,
    /// Categorical series palette.
    pub palette: Vec<Rgba>,
    /// Color for unkeyed series.
    pub default_series_color: Rgba,
    /// Show grid lines.
    pub show_grid: bool,
    /// Show panel border.
    pub show_panel_border: bool,
    /// Grid line width.
    pub grid_width: f32,
    /// Point radius in pixels.
    pub point_size: f32,
    /// Line stroke width in pixels.
    pub line_width: f32,
    /// Bar fill opacity (shared-position layers overlap).
    pub bar_opacity: f32,
    /// Tick/strip label font size.
    pub font_size: f32,
    /// Plot title font size.
    pub title_font_size: f32,
    /// Inner margin between panel edge and drawable area.
    pub margin: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::grey()
    }
}

impl Theme {
    /// Grey theme (light grey panels, white grid).
    #[must_use]
    pub fn grey() -> Self {
        Self {
            background: Rgba::WHITE,
            panel_background: Rgba::rgb(235, 235, 235),
            grid_color: Rgba::WHITE,
            axis_color: Rgba::rgb(50, 50, 50),
            text_color: Rgba::rgb(50, 50, 50),
            annotation_color: Rgba::rgb(120, 120, 120),
            palette: PALETTE.to_vec(),
            default_series_color: Rgba::rgb(66, 133, 244),
            show_grid: true,
            show_panel_border: false,
            grid_width: 1.0,
            point_size: 3.0,
            line_width: 1.5,
            bar_opacity: 0.85,
            font_size: 10.0,
            title_font_size: 14.0,
            margin: 30.0,
        }
    }

    /// Minimal theme with white panels and faint grid.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            grid_color: Rgba::rgb(220, 220, 220),
            grid_width: 0.5,
            ..Self::grey()
        }
    }

    /// Dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            background: Rgba::rgb(30, 30, 30),
            panel_background: Rgba::rgb(40, 40, 40),
            grid_color: Rgba::rgb(60, 60, 60),
            axis_color: Rgba::rgb(180, 180, 180),
            text_color: Rgba::rgb(220, 220, 220),
            annotation_color: Rgba::rgb(150, 150, 150),
            ..Self::grey()
        }
    }

    /// Black and white theme with panel borders.
    #[must_use]
    pub fn bw() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            grid_color: Rgba::rgb(200, 200, 200),
            axis_color: Rgba::BLACK,
            text_color: Rgba::BLACK,
            show_panel_border: true,
            grid_width: 0.5,
            ..Self::grey()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default_is_grey() {
        let theme = Theme::default();
        assert_eq!(theme.panel_background, Rgba::rgb(235, 235, 235));
        assert!(theme.show_grid);
    }

    #[test]
    fn test_theme_dark_background() {
        let theme = Theme::dark();
        assert_eq!(theme.background, Rgba::rgb(30, 30, 30));
        assert_eq!(theme.palette.len(), PALETTE.len());
    }

    #[test]
    fn test_theme_bw_border() {
        assert!(Theme::bw().show_panel_border);
        assert!(!Theme::grey().show_panel_border);
    }
}
