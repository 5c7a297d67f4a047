//! Application theming

use egui::{Color32, Visuals};

/// Application theme
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub surface: Color32,
    pub primary: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    /// Buttons, titles and links
    pub accent: Color32,
    /// Ring around the active thumbnail
    pub highlight: Color32,
    pub disabled: Color32,
    /// Translucent backdrop behind panels
    pub overlay: Color32,
    pub frame_outer: Color32,
    pub frame_inner: Color32,
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(18, 16, 14),
            surface: Color32::from_rgb(30, 28, 26),
            primary: Color32::from_rgb(52, 48, 44),
            text: Color32::from_rgb(229, 231, 235),
            text_secondary: Color32::from_rgb(156, 163, 175),
            accent: Color32::from_rgb(245, 158, 11), // Amber
            highlight: Color32::from_rgb(234, 179, 8),
            disabled: Color32::from_rgb(107, 114, 128),
            overlay: Color32::from_black_alpha(178),
            frame_outer: Color32::from_rgb(92, 64, 36),
            frame_inner: Color32::from_rgb(181, 137, 66),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(245, 241, 234),
            surface: Color32::from_rgb(255, 252, 247),
            primary: Color32::from_rgb(230, 224, 214),
            text: Color32::from_rgb(32, 28, 24),
            text_secondary: Color32::from_rgb(100, 94, 86),
            accent: Color32::from_rgb(217, 119, 6),
            highlight: Color32::from_rgb(202, 138, 4),
            disabled: Color32::from_rgb(156, 163, 175),
            overlay: Color32::from_white_alpha(200),
            frame_outer: Color32::from_rgb(120, 84, 48),
            frame_inner: Color32::from_rgb(201, 160, 90),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.name == "dark"
    }

    /// Apply theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let mut visuals = if self.is_dark() {
            Visuals::dark()
        } else {
            Visuals::light()
        };

        visuals.panel_fill = self.background;
        visuals.window_fill = self.surface;
        visuals.extreme_bg_color = self.background;
        visuals.faint_bg_color = self.primary;
        visuals.hyperlink_color = self.accent;

        visuals.widgets.noninteractive.bg_fill = self.surface;
        visuals.widgets.noninteractive.fg_stroke.color = self.text;

        visuals.widgets.inactive.bg_fill = self.primary;
        visuals.widgets.inactive.fg_stroke.color = self.text;

        visuals.widgets.hovered.bg_fill = self.accent.linear_multiply(0.3);
        visuals.widgets.hovered.fg_stroke.color = self.text;

        visuals.widgets.active.bg_fill = self.accent.linear_multiply(0.5);
        visuals.widgets.active.fg_stroke.color = self.text;

        visuals.selection.bg_fill = self.accent.linear_multiply(0.3);
        visuals.selection.stroke.color = self.accent;

        style.visuals = visuals;
        ctx.set_style(style);
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!("Unknown theme {:?}, using dark", other);
                Self::dark()
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(Theme::by_name("Light").name, "light");
        assert_eq!(Theme::by_name("dark").name, "dark");
        assert_eq!(Theme::by_name("sepia").name, "dark");
    }

    #[test]
    fn test_apply_sets_accent() {
        let ctx = egui::Context::default();
        let theme = Theme::dark();
        theme.apply(&ctx);
        assert_eq!(ctx.style().visuals.hyperlink_color, theme.accent);
        assert!(ctx.style().visuals.dark_mode);
    }
}
