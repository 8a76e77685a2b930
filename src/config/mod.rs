use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub inference_server: InferenceServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceServerSettings {
    /// Base URL of the ONNX inference server this relay forwards to.
    pub url: String,
    /// Upper bound on a single prediction call, in seconds.
    #[serde(default = "default_predict_timeout_secs")]
    pub predict_timeout_secs: u64,
    /// Upper bound on the health probe, in seconds.
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
}

fn default_predict_timeout_secs() -> u64 {
    30
}

fn default_health_timeout_secs() -> u64 {
    5
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("config");

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
