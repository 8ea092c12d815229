use std::sync::Arc;

use anyhow::Result;
use dadabase_tui::config::AppConfig;
use dadabase_tui::internal::audio::{AudioRegistry, backend_for};
use dadabase_tui::internal::ui::app::App;
use dadabase_tui::tui;

#[tokio::main]
async fn main() -> Result<()> {
    // Config is read once, before logging, so it can pick the log directory.
    // What loading found is logged once a subscriber is installed.
    let (config, config_report) = AppConfig::load();

    // While the TUI owns the terminal, logs must not reach stdout/stderr, so
    // they go to a daily rolling file. If the TUI cannot start, log to the
    // console instead so the failure is visible.
    match tui::init() {
        Ok(terminal) => {
            let log_dir = config.logging.log_directory.as_deref().unwrap_or("logs");
            let file_appender = tracing_appender::rolling::daily(log_dir, "dadabase.log");
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

            // RUST_LOG takes precedence over the configured levels.
            let env_filter = match std::env::var("RUST_LOG") {
                Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
                Err(_) => tracing_subscriber::EnvFilter::new(config.logging.filter_directive()),
            };

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();
            config_report.log();

            let audio = Arc::new(AudioRegistry::new(
                backend_for(config.sound.backend),
                &config.sound,
            ));
            let mut app = App::new(config, audio);
            let res = app.run(terminal).await;

            tui::restore()?;

            if let Err(err) = res {
                eprintln!("{err:?}");
            }

            Ok(())
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .init();
            config_report.log();

            eprintln!("Failed to initialize TUI: {e:?}");
            Err(e.into())
        }
    }
}
