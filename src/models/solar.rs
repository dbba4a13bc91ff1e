use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Months & cyclical features ──────────────────────────────────────────────

/// Calendar month, closed over the twelve UI tokens `"Jan".."Dec"`.
/// Declaration order fixes the ordinal (Jan = 0 … Dec = 11) that the
/// cyclical encoding maps onto the unit circle. Unrecognized labels are
/// rejected at the serde boundary instead of silently defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Ordinal position 0–11; defines the month's angle on the unit circle.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Cyclical (sin, cos) encoding of a month, sent as model input.
/// Invariant: `sin² + cos² == 1` within floating tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeaturePair {
    pub sin: f64,
    pub cos: f64,
}

// ─── Place selection ─────────────────────────────────────────────────────────

/// Payload the map/autocomplete collaborator supplies on each selection
/// event. `locality` is the city-level component used for the regional
/// dataset match; it is often missing for rural or water locations.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    pub locality: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

// ─── Regional dataset rows ───────────────────────────────────────────────────

/// One pre-computed regional solar-potential row, keyed by locality name.
/// Immutable once loaded; read-only to the core.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionRecord {
    pub region_name: String,
    pub percent_qualified: f64,
    pub count_qualified: u64,
    pub total_area_sqft: f64,
    pub kw_total: f64,
    pub yearly_sunlight_kwh_total: f64,
    pub yearly_sunlight_kwh_f: f64,
    pub yearly_sunlight_kwh_s: f64,
    pub yearly_sunlight_kwh_w: f64,
    pub yearly_sunlight_kwh_e: f64,
    pub yearly_sunlight_kwh_n: f64,
    pub carbon_offset_metric_tons: f64,
    /// Serialized sequence of `[bucket_start_kw, roof_count]` pairs.
    /// Consumed by the chart collaborator, never by the core.
    pub install_size_kw_buckets_json: String,
}

/// One decoded histogram bucket from `install_size_kw_buckets_json`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SizeBucket {
    pub start_kw: f64,
    pub count: f64,
}

// ─── Derived savings metrics ─────────────────────────────────────────────────

/// Output of the savings calculator, full precision. Display rounding is
/// applied separately at the view boundary and never feeds back in here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsEstimate {
    pub annual_energy_kwh: f64,
    pub carbon_offset_tons: f64,
    pub tree_equivalent: u64,
    pub monthly_saving_kwh: f64,
    pub monthly_saving_usd: f64,
}

// ─── Prediction service wire types ───────────────────────────────────────────

/// Outbound body for the prediction endpoint. Field names follow the model
/// server's training-frame columns, hence the non-Rust casing.
#[derive(Debug, Serialize)]
pub struct PredictRequest {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Month_sin")]
    pub month_sin: f64,
    #[serde(rename = "Month_cos")]
    pub month_cos: f64,
    #[serde(rename = "ALLSKY_KT")]
    pub allsky_kt: f64,
    #[serde(rename = "ALLSKY_SFC_LW_DWN")]
    pub allsky_sfc_lw_dwn: f64,
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    /// Predicted daily solar energy yield, kWh/m²/day.
    pub prediction: f64,
}

// ─── UI event intake ─────────────────────────────────────────────────────────

/// One widget event per POST. Panel-area and bill changes carry the raw
/// text of the input field; non-numeric text is coerced to 0 downstream.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiEvent {
    PlaceSelected { place: Place },
    MonthChanged { month: Month },
    PanelAreaChanged { value: String },
    MonthlyBillChanged { value: String },
}

// ─── REST API response types ─────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionCreated {
    pub session_id: String,
    pub view: SessionView,
}

/// Snapshot the widget renders: selected-place panel, calculator inputs,
/// savings panel (absent while input is insufficient) and regional panel
/// (absent when the locality has no dataset match).
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub timestamp: DateTime<Utc>,
    pub month: Month,
    pub place: Option<PlaceView>,
    /// kWh/m²/day, 2 dp; `null` until a prediction arrives (rendered "N/A").
    pub predicted_daily_energy: Option<f64>,
    pub panel_area_m2: f64,
    pub monthly_bill_usd: f64,
    pub savings: Option<SavingsView>,
    pub region: Option<RegionSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceView {
    pub name: String,
    pub address: String,
    /// Coordinates rounded to 4 dp, as shown in the selected-place panel.
    pub latitude: f64,
    pub longitude: f64,
}

/// Savings metrics rounded for display (2 dp, integer tree count).
#[derive(Debug, Serialize, ToSchema)]
pub struct SavingsView {
    pub annual_energy_kwh: f64,
    pub carbon_offset_tons: f64,
    pub tree_equivalent: u64,
    pub monthly_saving_kwh: f64,
    pub monthly_saving_usd: f64,
}

/// Regional solar-potential panel: the matched dataset row's statistics
/// plus the decoded install-size histogram feed.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegionSummary {
    pub region_name: String,
    pub percent_qualified: f64,
    pub count_qualified: u64,
    pub total_area_sqft: f64,
    pub kw_total: f64,
    pub yearly_sunlight_kwh_total: f64,
    pub yearly_sunlight_kwh_f: f64,
    pub yearly_sunlight_kwh_s: f64,
    pub yearly_sunlight_kwh_w: f64,
    pub yearly_sunlight_kwh_e: f64,
    pub yearly_sunlight_kwh_n: f64,
    pub carbon_offset_metric_tons: f64,
    pub install_size_buckets: Vec<SizeBucket>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemConfig {
    pub server_port: u16,
    pub prediction_endpoint: String,
    pub allsky_kt: f64,
    pub allsky_sfc_lw_dwn: f64,
    pub dataset_path: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub regions_loaded: usize,
    pub sessions_active: usize,
}
