use log::*;
use service::{
    config::Config,
    logging::Logger,
    settings::{RelaySettings, SettingsHandle},
    AppState,
};

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
        std::process::exit(1);
    }

    let http_client = match domain::gateway::build_http_client() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(config, http_client);
    spawn_settings_reload(app_state.settings_handle().clone());

    if let Err(e) = web::init_server(app_state).await {
        error!("Server exited with error: {e}");
        std::process::exit(1);
    }
}

/// Re-reads `.env` and the environment on SIGHUP and swaps in the new settings.
#[cfg(unix)]
fn spawn_settings_reload(settings: SettingsHandle) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangups = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Settings reload on SIGHUP unavailable: {e}");
                return;
            }
        };
        while hangups.recv().await.is_some() {
            let reloaded = RelaySettings::from_config(&Config::from_env());
            info!("Reloaded relay settings: {reloaded:?}");
            settings.replace(reloaded);
        }
    });
}

#[cfg(not(unix))]
fn spawn_settings_reload(_settings: SettingsHandle) {}
