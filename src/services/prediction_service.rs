use crate::config::PredictionConfig;
use crate::models::solar::{FeaturePair, PredictRequest, PredictResponse};

/// Client for the external solar-yield prediction endpoint.
///
/// Every request carries the coordinates, the cyclical month features and
/// the canonical atmosphere pair from configuration. One request, one
/// response, no retry: a failed call degrades to "no prediction" and the
/// calculator falls back to its default constant.
#[derive(Clone, Debug)]
pub struct PredictionClient {
    http: reqwest::Client,
    endpoint: String,
    allsky_kt: f64,
    allsky_sfc_lw_dwn: f64,
}

impl PredictionClient {
    pub fn new(cfg: &PredictionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: cfg.endpoint.clone(),
            allsky_kt: cfg.allsky_kt,
            allsky_sfc_lw_dwn: cfg.allsky_sfc_lw_dwn,
        }
    }

    /// One prediction round-trip. Returns the predicted daily solar energy
    /// yield in kWh/m²/day.
    pub async fn predict(
        &self,
        latitude: f64,
        longitude: f64,
        features: FeaturePair,
    ) -> Result<f64, reqwest::Error> {
        let body = PredictRequest {
            latitude,
            longitude,
            month_sin: features.sin,
            month_cos: features.cos,
            allsky_kt: self.allsky_kt,
            allsky_sfc_lw_dwn: self.allsky_sfc_lw_dwn,
        };
        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let parsed = response.json::<PredictResponse>().await?;
        Ok(parsed.prediction)
    }

    /// Variant that folds every failure into `None`. The session reducer
    /// then clears the prediction and the default constant takes over;
    /// network trouble is never surfaced as a user-visible error beyond
    /// the widget's "N/A".
    pub async fn fetch_or_none(
        &self,
        latitude: f64,
        longitude: f64,
        features: FeaturePair,
    ) -> Option<f64> {
        match self.predict(latitude, longitude, features).await {
            Ok(value) => {
                #[cfg(feature = "verbose_log")]
                println!("[PREDICT] {} -> {:.4} kWh/m²/day", self.endpoint, value);
                Some(value)
            }
            Err(e) => {
                eprintln!("[PREDICT] Request to {} failed: {}", self.endpoint, e);
                None
            }
        }
    }
}
