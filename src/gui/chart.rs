use egui::{Align2, Color32, FontId, Sense, Stroke};

use crate::chart::ChartModel;

const AXIS_COLOR: Color32 = Color32::from_rgb(0x4f, 0x4f, 0x4f);
const FONT_SIZE: f32 = 15.0;

pub fn show(ui: &mut egui::Ui, model: &ChartModel) {
    ui.vertical_centered(|ui| {
        ui.strong(&model.title);
    });

    let size = egui::vec2(ui.available_width(), ui.available_height().max(200.0));
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);

    let plot = rect.shrink2(egui::vec2(36.0, 28.0));
    let ticks = model.y_ticks();
    let top = ticks.last().copied().unwrap_or(1).max(1) as f32;
    let y_for = |value: f32| plot.bottom() - plot.height() * value / top;

    for tick in &ticks {
        let y = y_for(*tick as f32);
        painter.line_segment(
            [egui::pos2(plot.left(), y), egui::pos2(plot.right(), y)],
            Stroke::new(0.5, Color32::LIGHT_GRAY),
        );
        painter.text(
            egui::pos2(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            tick.to_string(),
            FontId::proportional(FONT_SIZE),
            AXIS_COLOR,
        );
    }

    if model.bars.is_empty() {
        return;
    }
    let slot = plot.width() / model.bars.len() as f32;
    for (position, bar) in model.bars.iter().enumerate() {
        let left = plot.left() + slot * position as f32 + slot * 0.15;
        let bar_rect = egui::Rect::from_min_max(
            egui::pos2(left, y_for(bar.quantity as f32)),
            egui::pos2(left + slot * 0.7, plot.bottom()),
        );
        painter.rect_filled(bar_rect, 2.0, bar.color);
        if bar.quantity > 0 {
            painter.text(
                bar_rect.center_top() + egui::vec2(0.0, 4.0),
                Align2::CENTER_TOP,
                bar.quantity.to_string(),
                FontId::proportional(FONT_SIZE),
                Color32::WHITE,
            );
        }
        painter.text(
            egui::pos2(bar_rect.center().x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            &bar.label,
            FontId::proportional(FONT_SIZE),
            AXIS_COLOR,
        );
    }
}
