//! Buttons for stepping through items and toggling the story and original views

use super::GalleryAction;
use crate::theme::Theme;
use app_core::{t, GalleryView, I18n};
use egui::{Button, Color32, Rect, RichText, Stroke, Ui, Vec2};

const NAV_BUTTON_SIZE: f32 = 56.0;

/// Previous/next buttons laid over the left and right edges of the frame
pub struct NavButtons;

impl NavButtons {
    pub fn show(ui: &mut Ui, area: Rect, i18n: &I18n) -> Option<GalleryAction> {
        let size = Vec2::splat(NAV_BUTTON_SIZE);
        let left = Rect::from_center_size(
            egui::pos2(area.left() + NAV_BUTTON_SIZE * 0.5, area.center().y),
            size,
        );
        let right = Rect::from_center_size(
            egui::pos2(area.right() - NAV_BUTTON_SIZE * 0.5, area.center().y),
            size,
        );

        let mut action = None;

        if ui
            .put(left, Self::round_button("◀"))
            .on_hover_text(t!(i18n, "nav-previous"))
            .clicked()
        {
            action = Some(GalleryAction::Previous);
        }

        if ui
            .put(right, Self::round_button("▶"))
            .on_hover_text(t!(i18n, "nav-next"))
            .clicked()
        {
            action = Some(GalleryAction::Next);
        }

        action
    }

    fn round_button(glyph: &str) -> Button<'_> {
        Button::new(RichText::new(glyph).size(22.0).color(Color32::from_white_alpha(204)))
            .fill(Color32::from_black_alpha(76))
            .stroke(Stroke::NONE)
            .rounding(NAV_BUTTON_SIZE * 0.5)
    }
}

/// Story and original toggles shown above the story panel
pub struct ControlRow;

impl ControlRow {
    pub fn show(ui: &mut Ui, view: &GalleryView<'_>, i18n: &I18n, theme: &Theme) -> Option<GalleryAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            let story_label = if view.story_panel_open {
                t!(i18n, "story-hide")
            } else {
                t!(i18n, "story-show")
            };
            if ui.add(Self::outline_button(&story_label, theme, false)).clicked() {
                action = Some(GalleryAction::ToggleStory);
            }

            let original_label = if view.showing_alternate {
                t!(i18n, "original-hide")
            } else {
                t!(i18n, "original-show")
            };
            let button = Self::outline_button(&original_label, theme, view.showing_alternate);
            if ui.add_enabled(view.has_alternate, button).clicked() {
                action = Some(GalleryAction::ToggleOriginal);
            }
        });

        action
    }

    /// Amber outline button, filled when `active`
    fn outline_button<'a>(label: &str, theme: &Theme, active: bool) -> Button<'a> {
        let (text, fill) = if active {
            (Color32::BLACK, theme.accent)
        } else {
            (theme.accent, Color32::TRANSPARENT)
        };

        Button::new(RichText::new(label).color(text))
            .fill(fill)
            .stroke(Stroke::new(1.0, theme.accent))
            .rounding(6.0)
            .min_size(Vec2::new(120.0, 30.0))
    }
}
