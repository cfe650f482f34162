//! Table rendering via egui_extras

use egui_extras::{Column, TableBuilder};
use ts_views::{TableModel, TableView};

use super::ControlStyle;

const ROW_HEIGHT: f32 = 18.0;
const PANEL_FILL: egui::Color32 = egui::Color32::from_rgb(28, 28, 32);

/// Show the data table in a floating area anchored at the element's frame.
///
/// The drawn rect is reported back to the view so pointer hit testing
/// matches what is actually on screen, not the nominal frame.
pub fn show_table(ctx: &egui::Context, table: &TableView, style: &ControlStyle) {
    let model = table.model();
    egui::Area::new("data_table")
        .fixed_pos([model.frame.x, model.frame.y])
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(PANEL_FILL)
                .rounding(4.0)
                .inner_margin(6.0)
                .stroke(egui::Stroke::new(1.0, style.track_edge))
                .show(ui, |ui| {
                    table_contents(ui, &model, style);
                });
            let rect = ui.min_rect();
            table.set_measured_size(rect.width(), rect.height());
        });
}

fn table_contents(ui: &mut egui::Ui, model: &TableModel, style: &ControlStyle) {
    if model.headers.is_empty() {
        ui.label("no charts wired");
        return;
    }

    let mut builder = TableBuilder::new(ui)
        .striped(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(70.0).at_least(60.0));
    for _ in &model.headers {
        builder = builder.column(Column::initial(72.0).at_least(56.0));
    }

    builder
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("time");
            });
            for column in &model.headers {
                header.col(|ui| {
                    ui.strong(egui::RichText::new(&column.name).color(column.color));
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, model.rows.len(), |row_index, mut row| {
                let data = &model.rows[row_index];
                let highlighted = model.highlighted == Some(row_index);
                row.col(|ui| {
                    if highlighted {
                        ui.painter().rect_filled(
                            ui.available_rect_before_wrap(),
                            0.0,
                            style.highlight,
                        );
                        ui.label(
                            egui::RichText::new(&data.time_label).color(egui::Color32::BLACK),
                        );
                    } else {
                        ui.label(&data.time_label);
                    }
                });
                for cell in &data.cells {
                    row.col(|ui| {
                        // Gradient fills are light, so cell text is dark.
                        ui.painter()
                            .rect_filled(ui.available_rect_before_wrap(), 0.0, cell.fill);
                        ui.label(egui::RichText::new(&cell.label).color(egui::Color32::BLACK));
                    });
                }
            });
        });
}
