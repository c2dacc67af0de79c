use strikedesk::application::system::Application;
use strikedesk::config::Config;
use strikedesk::interfaces::Dashboard;
use strikedesk::interfaces::design_system::DesignSystem;

use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

// A writer that sends logs to the UI via a crossbeam channel
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).to_string();
        let _ = self.sender.try_send(msg);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// Cloneable wrapper for MakeWriter
#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 0. Load Env (before starting anything)
    dotenvy::dotenv().ok();

    // 1. Create Log Channel
    let (log_tx, log_rx) = crossbeam_channel::unbounded();

    // 2. Setup Logging (Stdout + UI)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false) // No color codes for UI text
        .with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    info!("Initializing Strikedesk {}...", env!("CARGO_PKG_VERSION"));

    // 3. Config + Application (fails fast on bad env)
    let config = Config::from_env()?;
    let app = Application::build(config)?;

    // 4. Tokio Runtime in a background thread
    let (handle_tx, handle_rx) = crossbeam_channel::bounded(1);

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to build Tokio runtime: {}", e);
                return;
            }
        };

        let _ = handle_tx.send(rt.handle().clone());
        info!("Background Runtime Started.");

        // Keep the runtime alive for the lifetime of the UI
        rt.block_on(std::future::pending::<()>());
    });

    let runtime = handle_rx
        .recv()
        .map_err(|_| anyhow::anyhow!("Background runtime failed to start"))?;

    // 5. Run UI (Blocks Main Thread)
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_title("Strikedesk"),
        ..Default::default()
    };

    eframe::run_native(
        "Strikedesk",
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(DesignSystem::theme());
            let mut dashboard = Dashboard::new(app, runtime, log_rx);
            dashboard.fetch(&cc.egui_ctx);
            Ok(Box::new(dashboard))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
