use config::Config;
use settings::{RelaySettings, SettingsHandle};

pub mod config;
pub mod logging;
pub mod settings;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub settings: SettingsHandle,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(app_config: Config, http_client: reqwest::Client) -> Self {
        let settings = SettingsHandle::new(RelaySettings::from_config(&app_config));
        Self {
            config: app_config,
            settings,
            http_client,
        }
    }

    pub fn settings_handle(&self) -> &SettingsHandle {
        &self.settings
    }

    pub fn http_client_ref(&self) -> &reqwest::Client {
        &self.http_client
    }
}
