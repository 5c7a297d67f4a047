//! Collapsible panel with the item's story

use super::GalleryAction;
use crate::theme::Theme;
use app_core::{t, I18n, ItemInfo};
use egui::{Frame, Margin, RichText, ScrollArea, Ui};

/// Seconds for the panel to open or close
const ANIMATION_TIME: f32 = 0.3;

pub struct StoryPanel;

impl StoryPanel {
    /// Show the story for `info`. The panel fades in and out with `open`.
    pub fn show(ui: &mut Ui, info: &ItemInfo, open: bool, i18n: &I18n, theme: &Theme) -> Option<GalleryAction> {
        let openness = ui
            .ctx()
            .animate_bool_with_time(ui.id().with("story_panel"), open, ANIMATION_TIME);
        if openness <= 0.0 {
            return None;
        }

        let mut action = None;
        let max_height = ui.available_height() * openness;

        ui.scope(|ui| {
            ui.set_opacity(openness);

            Frame::none()
                .fill(theme.overlay)
                .stroke(egui::Stroke::new(1.0, theme.primary))
                .rounding(8.0)
                .inner_margin(Margin::same(16.0))
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .max_height(max_height)
                        .auto_shrink([false, true])
                        .show(ui, |ui| {
                            ui.label(RichText::new(&info.title).size(20.0).strong().color(theme.accent));

                            let byline = info.byline();
                            if !byline.is_empty() {
                                ui.label(RichText::new(byline).color(theme.text_secondary));
                            }
                            ui.add_space(8.0);

                            ui.label(RichText::new(&info.description).color(theme.text));

                            if !info.link.is_empty() {
                                ui.add_space(8.0);
                                let link = ui
                                    .link(RichText::new(t!(i18n, "source-article")).underline())
                                    .on_hover_text(&info.link);
                                if link.clicked() {
                                    action = Some(GalleryAction::OpenLink(info.link.clone()));
                                }
                            }
                        });
                });
        });

        action
    }
}
