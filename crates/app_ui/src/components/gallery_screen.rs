//! Full gallery screen: header, framed item, controls, story and thumbnails

use super::{ControlRow, Header, ItemFrame, NavButtons, StoryPanel, ThumbnailStrip};
use crate::textures::TextureCache;
use crate::theme::Theme;
use app_core::{t, GalleryCommand, GalleryView, I18n};
use egui::{CentralPanel, Frame, Margin, SidePanel, TopBottomPanel};

/// User intent collected while drawing a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryAction {
    Previous,
    Next,
    Select(usize),
    ToggleStory,
    ToggleOriginal,
    OpenLink(String),
}

impl GalleryAction {
    /// Controller command for this action, if it has one
    pub fn command(&self) -> Option<GalleryCommand> {
        match self {
            GalleryAction::Previous => Some(GalleryCommand::Previous),
            GalleryAction::Next => Some(GalleryCommand::Next),
            GalleryAction::Select(index) => Some(GalleryCommand::GoTo(*index)),
            GalleryAction::ToggleStory => Some(GalleryCommand::ToggleStoryPanel),
            GalleryAction::ToggleOriginal => Some(GalleryCommand::ToggleAlternate),
            GalleryAction::OpenLink(_) => None,
        }
    }
}

/// Persistent UI state of the gallery screen
#[derive(Default)]
pub struct GalleryScreen {
    thumbnails: ThumbnailStrip,
}

impl GalleryScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out the whole screen for one frame
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        view: &GalleryView<'_>,
        textures: &TextureCache,
        flip_progress: Option<f32>,
        i18n: &I18n,
        theme: &Theme,
    ) -> Option<GalleryAction> {
        let mut action = None;
        let panel_frame = Frame::none().fill(theme.overlay).inner_margin(Margin::symmetric(24.0, 12.0));

        TopBottomPanel::top("header").frame(panel_frame).show(ctx, |ui| {
            Header::show(ui, view.title, &view.position_text(), theme);
        });

        TopBottomPanel::bottom("thumbnails")
            .frame(panel_frame)
            .resizable(false)
            .show(ctx, |ui| {
                if let Some(a) = self.thumbnails.show(ui, view.items, view.current_index, textures, theme) {
                    action = Some(a);
                }
            });

        let details_width = (ctx.screen_rect().width() * 0.42).max(280.0);
        SidePanel::right("details")
            .frame(Frame::none().inner_margin(Margin::same(16.0)))
            .exact_width(details_width)
            .resizable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    if let Some(a) = ControlRow::show(ui, view, i18n, theme) {
                        action = Some(a);
                    }
                });
                ui.add_space(12.0);

                if let Some(a) = StoryPanel::show(ui, view.info(), view.story_panel_open, i18n, theme) {
                    action = Some(a);
                }
            });

        CentralPanel::default()
            .frame(Frame::none().fill(theme.background).inner_margin(Margin::same(24.0)))
            .show(ctx, |ui| {
                let area = ui.available_rect_before_wrap();
                let texture = textures.best(view.displayed_image);

                // A new id per displayed image resets per-picture widget state
                ui.push_id(view.frame_key(), |ui| {
                    ItemFrame::show(ui, area, texture, flip_progress, &t!(i18n, "image-loading"), theme);
                });

                if let Some(a) = NavButtons::show(ui, area, i18n) {
                    action = Some(a);
                }
            });

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{Catalog, GalleryController, GalleryItem};

    #[test]
    fn test_action_commands() {
        assert_eq!(GalleryAction::Next.command(), Some(GalleryCommand::Next));
        assert_eq!(GalleryAction::Select(4).command(), Some(GalleryCommand::GoTo(4)));
        assert_eq!(GalleryAction::ToggleOriginal.command(), Some(GalleryCommand::ToggleAlternate));
        assert_eq!(GalleryAction::OpenLink("https://example.org".into()).command(), None);
    }

    #[test]
    fn test_screen_lays_out_headless() {
        let catalog = Catalog::new(vec![
            GalleryItem::new("a", "/a.png").with_original("/a-orig.png"),
            GalleryItem::new("b", "/b.png"),
        ])
        .unwrap();
        let mut gallery = GalleryController::new(catalog);
        gallery.toggle_story_panel();

        let ctx = egui::Context::default();
        let i18n = I18n::builtin("vi").unwrap();
        let theme = Theme::dark();
        let textures = TextureCache::new();
        let mut screen = GalleryScreen::new();

        let mut action = Some(GalleryAction::Next);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = screen.show(ctx, &gallery.view(), &textures, None, &i18n, &theme);
        });

        // Nothing was clicked
        assert_eq!(action, None);
    }
}
