use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::state::Dashboard;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// A change requested through one multi-select.
enum FilterAction {
    Toggle(String),
    All,
    None,
}

/// Render one collapsible multi-select; returns the click, if any.
fn multi_select(
    ui: &mut Ui,
    title: &str,
    options: &[String],
    selected: &BTreeSet<String>,
    colors: &ColorMap,
) -> Option<FilterAction> {
    let mut action = None;
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    action = Some(FilterAction::All);
                }
                if ui.small_button("None").clicked() {
                    action = Some(FilterAction::None);
                }
            });

            for value in options {
                let mut checked = selected.contains(value);
                let text = RichText::new(value).color(colors.color_for(value));
                if ui.checkbox(&mut checked, text).changed() {
                    action = Some(FilterAction::Toggle(value.clone()));
                }
            }
        });

    action
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut Dashboard) {
    ui.heading("Filters");
    ui.separator();

    // Hold our own handle so the option lists outlive mutations of `state`.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let products = multi_select(
                ui,
                "Select Products",
                &dataset.products,
                &state.selection.products,
                &state.product_colors,
            );
            match products {
                Some(FilterAction::Toggle(p)) => state.toggle_product(&p),
                Some(FilterAction::All) => state.select_all_products(),
                Some(FilterAction::None) => state.select_no_products(),
                None => {}
            }

            ui.separator();

            let regions = multi_select(
                ui,
                "Select Regions",
                &dataset.regions,
                &state.selection.regions,
                &state.region_colors,
            );
            match regions {
                Some(FilterAction::Toggle(r)) => state.toggle_region(&r),
                Some(FilterAction::All) => state.select_all_regions(),
                Some(FilterAction::None) => state.select_no_regions(),
                None => {}
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut Dashboard) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_file = state.data_path.is_some();
            if ui.add_enabled(has_file, egui::Button::new("Reload")).clicked() {
                if state.reload().is_ok() {
                    log::info!("Reloaded {}", loaded_path(state));
                }
                ui.close_menu();
            }
            if ui
                .add_enabled(has_file, egui::Button::new("Force reload"))
                .clicked()
            {
                if state.force_reload().is_ok() {
                    log::info!("Force-reloaded {}", loaded_path(state));
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} sales loaded, {} visible",
                ds.len(),
                state.snapshot.indices.len()
            ));
            if let Some(src) = &ds.source {
                ui.label(RichText::new(src.display().to_string()).weak());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut Dashboard) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "tsv", "tab", "json", "parquet", "pq"])
        .add_filter("Delimited text", &["csv", "tsv", "tab"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if state.open(&path).is_ok() {
            if let Some(ds) = &state.dataset {
                log::info!(
                    "Showing {} sales across {} products and {} regions",
                    ds.len(),
                    ds.products.len(),
                    ds.regions.len()
                );
            }
        }
    }
}

fn loaded_path(state: &Dashboard) -> String {
    state
        .data_path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
