use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::format::{format_count, format_currency};
use crate::data::model::REQUIRED_COLUMNS;
use crate::state::Dashboard;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

/// Every filtered row, in file order.
pub fn raw_data(ui: &mut Ui, state: &Dashboard, symbol: &str) {
    let Some(view) = state.view() else {
        return;
    };
    if view.is_empty() {
        ui.label(RichText::new("No rows.").italics().weak());
        return;
    }

    let records = &view.dataset().records;
    let indices = view.indices();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(90.0))
        .columns(Column::auto().at_least(100.0), 2)
        .column(Column::auto().at_least(70.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for name in REQUIRED_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                let rec = &records[indices[row.index()]];
                row.col(|ui| {
                    ui.label(rec.date.format("%Y-%m-%d").to_string());
                });
                row.col(|ui| {
                    ui.label(rec.product.as_str());
                });
                row.col(|ui| {
                    ui.label(rec.region.as_str());
                });
                row.col(|ui| {
                    ui.label(rec.quantity.to_string());
                });
                row.col(|ui| {
                    ui.label(format_currency(rec.total, 2, symbol));
                });
            });
        });

    ui.label(
        RichText::new(format!(
            "{} rows · {} units sold",
            format_count(indices.len() as u64),
            format_count(state.snapshot.quantity_sold),
        ))
        .weak(),
    );
}
