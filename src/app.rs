use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::config::DisplayConfig;
use crate::state::Dashboard;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalesDashboardApp {
    pub state: Dashboard,
    pub display: DisplayConfig,
}

impl Default for SalesDashboardApp {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}

impl SalesDashboardApp {
    pub fn new(display: DisplayConfig) -> Self {
        Self {
            state: Dashboard::default(),
            display,
        }
    }
}

impl eframe::App for SalesDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a sales file to view the dashboard  (File → Open…)");
                });
                return;
            }

            let symbol = self.display.currency_symbol.as_str();
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.label(RichText::new("Sales Performance Dashboard").size(28.0).strong());
                    ui.add_space(8.0);

                    section(ui, "Key Metrics", |ui| charts::key_metrics(ui, &self.state, symbol));
                    section(ui, "Revenue by Product", |ui| {
                        charts::revenue_by_product(ui, &self.state, symbol)
                    });
                    section(ui, "Monthly Sales Trend", |ui| {
                        charts::monthly_trend(ui, &self.state, symbol)
                    });
                    section(ui, "Sales by Region", |ui| {
                        charts::region_distribution(ui, &self.state, symbol)
                    });
                    section(ui, "Quantity vs Total", |ui| {
                        charts::quantity_vs_total(ui, &self.state, symbol)
                    });
                    ui.heading("Raw Data");
                    table::raw_data(ui, &self.state, symbol);
                });
        });
    }
}

/// A titled dashboard block followed by a divider.
fn section(ui: &mut Ui, title: &str, body: impl FnOnce(&mut Ui)) {
    ui.heading(title);
    ui.add_space(4.0);
    body(ui);
    ui.add_space(4.0);
    ui.separator();
}
