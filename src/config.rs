use serde::Deserialize;

fn default_server_port() -> u16 { 8080 }
fn default_prediction_endpoint() -> String { "http://localhost:5000/predict".to_string() }
fn default_allsky_kt() -> f64 { 0.47 }
fn default_allsky_sfc_lw_dwn() -> f64 { 7.43 }
fn default_dataset_path() -> String { "data/chicago_solar.csv".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    /// Prediction model endpoint, POST JSON in / JSON out.
    #[serde(default = "default_prediction_endpoint")]
    pub endpoint: String,
    /// All-sky clearness index sent with every request.
    #[serde(default = "default_allsky_kt")]
    pub allsky_kt: f64,
    /// All-sky surface longwave downward irradiance sent with every request.
    #[serde(default = "default_allsky_sfc_lw_dwn")]
    pub allsky_sfc_lw_dwn: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { port: default_server_port() }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        PredictionConfig {
            endpoint: default_prediction_endpoint(),
            allsky_kt: default_allsky_kt(),
            allsky_sfc_lw_dwn: default_allsky_sfc_lw_dwn(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig { path: default_dataset_path() }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
