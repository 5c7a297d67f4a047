//! Strip of thumbnails for jumping straight to an item

use super::GalleryAction;
use crate::textures::TextureCache;
use crate::theme::Theme;
use app_core::GalleryItem;
use egui::{Color32, Pos2, Rect, ScrollArea, Sense, Stroke, Ui, Vec2};

const THUMB_SIZE: Vec2 = Vec2::new(80.0, 64.0);
const ACTIVE_SCALE: f32 = 1.05;
const INACTIVE_OPACITY: f32 = 0.7;

#[derive(Default)]
pub struct ThumbnailStrip {
    /// Index the strip was last scrolled to
    scrolled_to: Option<usize>,
}

impl ThumbnailStrip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show one thumbnail per item, highlighting `current`
    pub fn show(
        &mut self,
        ui: &mut Ui,
        items: &[GalleryItem],
        current: usize,
        textures: &TextureCache,
        theme: &Theme,
    ) -> Option<GalleryAction> {
        let mut action = None;

        ScrollArea::horizontal()
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 12.0;

                    for (index, item) in items.iter().enumerate() {
                        let active = index == current;
                        let (slot, response) = ui.allocate_exact_size(THUMB_SIZE * ACTIVE_SCALE, Sense::click());
                        let response = response.on_hover_text(&item.info.title);

                        let rect = if active {
                            Rect::from_center_size(slot.center(), THUMB_SIZE * ACTIVE_SCALE)
                        } else {
                            Rect::from_center_size(slot.center(), THUMB_SIZE)
                        };

                        let opacity = if active || response.hovered() { 1.0 } else { INACTIVE_OPACITY };
                        let painter = ui.painter();

                        match textures.get(&item.image, app_core::AssetKind::Thumbnail) {
                            Some(texture) => {
                                let uv = cover_uv(texture.size(), rect.size());
                                painter.image(texture.id(), rect, uv, Color32::WHITE.gamma_multiply(opacity));
                            }
                            None => {
                                painter.rect_filled(rect, 6.0, theme.primary.gamma_multiply(opacity));
                            }
                        }

                        let ring = if active { theme.highlight } else { Color32::TRANSPARENT };
                        painter.rect_stroke(rect, 6.0, Stroke::new(2.0, ring));

                        if response.clicked() {
                            action = Some(GalleryAction::Select(index));
                        }

                        if active && self.scrolled_to != Some(current) {
                            response.scroll_to_me(Some(egui::Align::Center));
                            self.scrolled_to = Some(current);
                        }
                    }
                });
            });

        action
    }
}

/// UV rect that crops a texture to fill `target` without distortion
pub fn cover_uv(texture: [usize; 2], target: Vec2) -> Rect {
    let full = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    let [w, h] = texture;
    if w == 0 || h == 0 || target.x <= 0.0 || target.y <= 0.0 {
        return full;
    }

    let texture_aspect = w as f32 / h as f32;
    let target_aspect = target.x / target.y;

    if texture_aspect > target_aspect {
        let visible = target_aspect / texture_aspect;
        let margin = (1.0 - visible) * 0.5;
        Rect::from_min_max(Pos2::new(margin, 0.0), Pos2::new(1.0 - margin, 1.0))
    } else {
        let visible = texture_aspect / target_aspect;
        let margin = (1.0 - visible) * 0.5;
        Rect::from_min_max(Pos2::new(0.0, margin), Pos2::new(1.0, 1.0 - margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_uv_crops_wide_texture() {
        let uv = cover_uv([200, 100], Vec2::new(100.0, 100.0));
        assert!((uv.min.x - 0.25).abs() < 1e-6);
        assert!((uv.max.x - 0.75).abs() < 1e-6);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);
    }

    #[test]
    fn test_cover_uv_crops_tall_texture() {
        let uv = cover_uv([100, 400], Vec2::new(100.0, 100.0));
        assert_eq!(uv.min.x, 0.0);
        assert!((uv.min.y - 0.375).abs() < 1e-6);
        assert!((uv.max.y - 0.625).abs() < 1e-6);
    }

    #[test]
    fn test_cover_uv_degenerate() {
        let full = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        assert_eq!(cover_uv([0, 10], Vec2::new(10.0, 10.0)), full);
        assert_eq!(cover_uv([10, 10], Vec2::ZERO), full);
    }
}
