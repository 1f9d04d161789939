use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;
use log::info;
use once_cell::sync::OnceCell;

use livepoll::config::Config;
use livepoll::credentials::load_token;
use livepoll::gui::{self, state::AppState};
use livepoll::routes::Route;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("loading configuration")?;
    let token = load_token(&config)?;
    let route = std::env::args()
        .nth(1)
        .map(|arg| Route::parse(&arg))
        .unwrap_or_default();
    info!("Starting at {:?}", route);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    // The window context only exists once eframe runs; the transport wakes it through this cell.
    let egui_ctx: Arc<OnceCell<egui::Context>> = Arc::new(OnceCell::new());
    let waker_ctx = Arc::clone(&egui_ctx);
    let wake: livepoll::websocket::Waker = Arc::new(move || {
        if let Some(ctx) = waker_ctx.get() {
            ctx.request_repaint();
        }
    });

    let mut state = AppState::new(config, token, runtime, wake);
    state.navigate(route);

    let builder = egui::ViewportBuilder::default()
        .with_title("Live Poll")
        .with_inner_size(egui::vec2(720.0, 520.0));

    let options = eframe::NativeOptions {
        viewport: builder,
        ..Default::default()
    };

    eframe::run_simple_native("Live Poll", options, move |ctx, _frame| {
        let _ = egui_ctx.set(ctx.clone());
        gui::ui_main(ctx, &mut state);
    })
    .map_err(|e| anyhow::anyhow!("GUI terminated: {}", e))
}
