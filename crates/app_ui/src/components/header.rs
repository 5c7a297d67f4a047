//! Exhibition header

use crate::theme::Theme;
use egui::{RichText, Ui};

pub struct Header;

impl Header {
    pub fn show(ui: &mut Ui, title: &str, position: &str, theme: &Theme) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(title).size(22.0).strong().color(theme.accent));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(position).color(theme.text_secondary).monospace());
            });
        });
    }
}
