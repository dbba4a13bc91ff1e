use std::io::Read;
use std::path::Path;

use crate::models::solar::{RegionRecord, SizeBucket};

/// Load the regional solar-potential dataset. Called once at startup; the
/// returned records are never mutated afterwards. Rows that fail to
/// deserialize are skipped with a warning; a partial dataset still serves
/// lookups, the affected localities simply never match.
pub fn load(path: &Path) -> Result<Vec<RegionRecord>, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(path)?;
    let records = read_records(file);
    println!(
        "[DATASET] Loaded {} regions from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

fn read_records<R: Read>(input: R) -> Vec<RegionRecord> {
    let mut reader = csv::Reader::from_reader(input);
    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<RegionRecord>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            // Header is line 1, so the first data row is line 2.
            Err(e) => eprintln!("[DATASET] Skipping row at line {}: {}", i + 2, e),
        }
    }
    records
}

/// Case-insensitive exact match on the trimmed locality name. First match
/// wins; `None` is a valid, expected outcome (the regional panel is simply
/// suppressed). No fuzzy matching.
pub fn match_region<'a>(
    region_name: &str,
    dataset: &'a [RegionRecord],
) -> Option<&'a RegionRecord> {
    let wanted = region_name.trim().to_lowercase();
    dataset
        .iter()
        .find(|r| r.region_name.trim().to_lowercase() == wanted)
}

/// Decode `install_size_kw_buckets_json` into `[bucket_start, count]`
/// pairs for the chart collaborator. Undecodable input yields an empty
/// histogram, which suppresses that chart only.
pub fn decode_buckets(raw: &str) -> Vec<SizeBucket> {
    serde_json::from_str::<Vec<(f64, f64)>>(raw)
        .map(|pairs| {
            pairs
                .into_iter()
                .map(|(start_kw, count)| SizeBucket { start_kw, count })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
region_name,percent_qualified,count_qualified,total_area_sqft,kw_total,yearly_sunlight_kwh_total,yearly_sunlight_kwh_f,yearly_sunlight_kwh_s,yearly_sunlight_kwh_w,yearly_sunlight_kwh_e,yearly_sunlight_kwh_n,carbon_offset_metric_tons,install_size_kw_buckets_json
Chicago,76.69,241292,1068107060.5,7165281.25,8522074855.6,2014066721.3,2313075382.2,1404451486.9,1401499644.1,1388981621.1,3401710.1,\"[[0,94584],[5,54123],[10,31002]]\"
Evanston,81.12,12501,55023387.2,371151.5,441002133.7,104233812.5,120785511.0,72011458.2,71985210.4,71986141.6,176034.8,\"[[0,4812],[5,2711]]\"
";

    fn sample() -> Vec<RegionRecord> {
        read_records(SAMPLE_CSV.as_bytes())
    }

    #[test]
    fn test_read_records_parses_all_rows() {
        let records = sample();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region_name, "Chicago");
        assert_eq!(records[0].percent_qualified, 76.69);
        assert_eq!(records[0].count_qualified, 241_292);
        assert_eq!(records[1].kw_total, 371_151.5);
    }

    #[test]
    fn test_read_records_skips_malformed_rows() {
        let csv = "\
region_name,percent_qualified,count_qualified,total_area_sqft,kw_total,yearly_sunlight_kwh_total,yearly_sunlight_kwh_f,yearly_sunlight_kwh_s,yearly_sunlight_kwh_w,yearly_sunlight_kwh_e,yearly_sunlight_kwh_n,carbon_offset_metric_tons,install_size_kw_buckets_json
Good,50.0,10,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,\"[[0,1]]\"
Bad,not-a-number,10,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,\"[[0,1]]\"
AlsoGood,60.0,20,2.0,2.0,2.0,2.0,2.0,2.0,2.0,2.0,2.0,\"[[0,2]]\"
";
        let records = read_records(csv.as_bytes());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region_name, "Good");
        assert_eq!(records[1].region_name, "AlsoGood");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let ds = sample();
        let a = match_region("Chicago", &ds);
        let b = match_region("CHICAGO", &ds);
        let c = match_region("chicago", &ds);
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_match_trims_whitespace() {
        let ds = sample();
        assert!(match_region("  Evanston ", &ds).is_some());
    }

    #[test]
    fn test_no_match_is_absent_not_error() {
        let ds = sample();
        assert!(match_region("Springfield", &ds).is_none());
        assert!(match_region("", &ds).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let mut ds = sample();
        let mut dup = ds[0].clone();
        dup.region_name = "CHICAGO".to_string();
        dup.count_qualified = 1;
        ds.push(dup);
        // Two rows normalize to "chicago"; the earlier one is returned.
        let hit = match_region("Chicago", &ds).unwrap();
        assert_eq!(hit.count_qualified, 241_292);
    }

    #[test]
    fn test_decode_buckets() {
        let buckets = decode_buckets("[[0, 94584], [5, 54123.5]]");
        assert_eq!(
            buckets,
            vec![
                SizeBucket { start_kw: 0.0, count: 94584.0 },
                SizeBucket { start_kw: 5.0, count: 54123.5 },
            ]
        );
    }

    #[test]
    fn test_decode_buckets_bad_input_yields_empty() {
        assert!(decode_buckets("").is_empty());
        assert!(decode_buckets("not json").is_empty());
        assert!(decode_buckets("{\"a\":1}").is_empty());
    }

    #[test]
    fn test_buckets_from_loaded_record() {
        let ds = sample();
        let buckets = decode_buckets(&ds[1].install_size_kw_buckets_json);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].start_kw, 0.0);
        assert_eq!(buckets[1].count, 2711.0);
    }
}
