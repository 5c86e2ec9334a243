mod cli;

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;

use cli::Args;
use sales_dashboard::config::Config;
use sales_dashboard::SalesDashboardApp;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::discover(args.config.as_deref())?;
    let data_path = args.data_path(&config);

    let mut app = SalesDashboardApp::new(config.display.clone());
    // A load failure is shown in the top bar; the user can pick another file.
    if app.state.open(&data_path).is_ok() {
        log::info!("Opened {}", data_path.display());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Performance Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
