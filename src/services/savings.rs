use crate::models::solar::SavingsEstimate;

// ─── Calculator constants ────────────────────────────────────────────────────
// Fixed for output parity with the deployed widget; not configurable.
const ELECTRICITY_RATE_USD_PER_KWH: f64 = 0.15;
const CO2_LBS_PER_KWH: f64 = 0.85;
const LBS_PER_TON: f64 = 2000.0;
const TREE_CO2_LBS_PER_YEAR: f64 = 48.0;

/// Conservative regional average used whenever no model prediction exists,
/// kWh per m² per day.
pub const DEFAULT_DAILY_ENERGY_KWH_M2: f64 = 4.5;

/// Derive the savings metrics from panel area, monthly bill and the
/// predicted daily yield. Returns `None` when either user input is not
/// positive: insufficient input suppresses the display panel, it is not
/// an error. Pure: identical inputs give bit-identical outputs.
pub fn compute(
    panel_area_m2: f64,
    monthly_bill_usd: f64,
    prediction: Option<f64>,
) -> Option<SavingsEstimate> {
    // NaN inputs fail the comparisons and suppress output like any other
    // insufficient input.
    if !(panel_area_m2 > 0.0) || !(monthly_bill_usd > 0.0) {
        return None;
    }
    let daily_energy = prediction.unwrap_or(DEFAULT_DAILY_ENERGY_KWH_M2);

    // 1. Monthly consumption implied by the bill
    let monthly_usage_kwh = monthly_bill_usd / ELECTRICITY_RATE_USD_PER_KWH;

    // 2. Annual production for the given panel area
    let annual_energy_kwh = panel_area_m2 * daily_energy * 365.0;

    // 3. Carbon offset in tons
    let carbon_offset_tons = annual_energy_kwh * CO2_LBS_PER_KWH / LBS_PER_TON;

    // 4. Equivalent number of trees (whole trees)
    let tree_equivalent = tree_equivalent(carbon_offset_tons);

    // 5. Monthly energy saving, capped at what the user actually consumes;
    //    the panel cannot "save" more than the bill represents
    let monthly_saving_kwh = (annual_energy_kwh / 12.0).min(monthly_usage_kwh);

    // 6. Monthly money saving
    let monthly_saving_usd = monthly_saving_kwh * ELECTRICITY_RATE_USD_PER_KWH;

    Some(SavingsEstimate {
        annual_energy_kwh,
        carbon_offset_tons,
        tree_equivalent,
        monthly_saving_kwh,
        monthly_saving_usd,
    })
}

/// Whole-tree count absorbing the given carbon offset. Ties round half
/// away from zero (`f64::round`); on this non-negative domain that equals
/// the half-up rounding of the reference widget.
fn tree_equivalent(carbon_offset_tons: f64) -> u64 {
    (carbon_offset_tons * LBS_PER_TON / TREE_CO2_LBS_PER_YEAR).round() as u64
}

/// Round to 2 decimal places for display. Presentation-only: callers must
/// never feed the rounded value back into computation.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
