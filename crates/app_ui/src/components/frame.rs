//! Framed display of the current item

use crate::theme::Theme;
use egui::{Color32, Pos2, Rect, Stroke, TextureHandle, Ui, Vec2};

/// Width of the painted frame around the picture
const FRAME_WIDTH: f32 = 14.0;
/// Narrowest horizontal scale reached while flipping
const MIN_SQUASH: f32 = 0.02;
/// Aspect used while the picture has not loaded yet
const PLACEHOLDER_ASPECT: f32 = 4.0 / 3.0;

/// The picture inside a gilt frame
pub struct ItemFrame;

impl ItemFrame {
    /// Paint the frame centered in `area` and return the outer frame rect.
    ///
    /// `flip_progress` squashes the picture horizontally while an
    /// original/processed flip is in flight.
    pub fn show(
        ui: &mut Ui,
        area: Rect,
        texture: Option<&TextureHandle>,
        flip_progress: Option<f32>,
        placeholder: &str,
        theme: &Theme,
    ) -> Rect {
        let image_size = texture
            .map(|t| {
                let [w, h] = t.size();
                Vec2::new(w as f32, h as f32)
            })
            .unwrap_or(Vec2::new(PLACEHOLDER_ASPECT, 1.0));

        let inner_area = area.size() - Vec2::splat(FRAME_WIDTH * 2.0);
        let picture = fit_size(image_size, inner_area.max(Vec2::splat(1.0)));
        let squash = flip_scale(flip_progress);

        let picture_rect = Rect::from_center_size(
            area.center(),
            Vec2::new(picture.x * squash, picture.y),
        );
        let frame_rect = picture_rect.expand(FRAME_WIDTH);

        let painter = ui.painter_at(area);
        painter.rect_filled(frame_rect.translate(Vec2::new(4.0, 6.0)), 2.0, Color32::from_black_alpha(120));
        painter.rect_filled(frame_rect, 2.0, theme.frame_outer);
        painter.rect_stroke(frame_rect.shrink(FRAME_WIDTH * 0.5), 0.0, Stroke::new(3.0, theme.frame_inner));

        match texture {
            Some(texture) => {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture.id(), picture_rect, uv, Color32::WHITE);
            }
            None => {
                painter.rect_filled(picture_rect, 0.0, theme.surface);
                if squash > 0.5 {
                    painter.text(
                        picture_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        placeholder,
                        egui::FontId::proportional(18.0),
                        theme.text_secondary,
                    );
                }
            }
        }

        frame_rect
    }
}

/// Largest size with the image's aspect ratio that fits in `available`
pub fn fit_size(image: Vec2, available: Vec2) -> Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return Vec2::ZERO;
    }

    let scale = (available.x / image.x).min(available.y / image.y);
    image * scale
}

/// Horizontal scale of the picture at a point in the flip
pub fn flip_scale(progress: Option<f32>) -> f32 {
    match progress {
        Some(t) => (1.0 - ease_out(t.clamp(0.0, 1.0))).max(MIN_SQUASH),
        None => 1.0,
    }
}

/// Ease-out cubic function
fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_size_keeps_aspect() {
        let fitted = fit_size(Vec2::new(800.0, 600.0), Vec2::new(400.0, 400.0));
        assert_eq!(fitted, Vec2::new(400.0, 300.0));

        let fitted = fit_size(Vec2::new(100.0, 200.0), Vec2::new(400.0, 300.0));
        assert_eq!(fitted, Vec2::new(150.0, 300.0));

        assert_eq!(fit_size(Vec2::ZERO, Vec2::new(10.0, 10.0)), Vec2::ZERO);
    }

    #[test]
    fn test_flip_scale() {
        assert_eq!(flip_scale(None), 1.0);
        assert_eq!(flip_scale(Some(0.0)), 1.0);
        assert_eq!(flip_scale(Some(1.0)), MIN_SQUASH);

        let mut last = 1.0;
        for step in 1..=10 {
            let scale = flip_scale(Some(step as f32 / 10.0));
            assert!(scale <= last);
            last = scale;
        }
    }
}
