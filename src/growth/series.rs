//! Chart Data Assembly
//!
//! Turns weight records plus the optional WHO reference table into the
//! series the canvas chart draws.

use chrono::NaiveDate;

use crate::growth::age::{age_in_months, months_since};
use crate::growth::percentile::{Band, GrowthCurve};
use crate::state::global::WeightRecord;

/// Reference table coverage in months.
pub const MAX_REFERENCE_MONTH: i64 = 60;

/// Which age axis the series were computed on. The two are not
/// comparable; the chart labels them differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timeline {
    /// True age in months, derived from the birth date.
    Age,
    /// Months elapsed since the earliest measurement.
    Relative,
}

/// One measurement positioned on the age axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartPoint {
    pub age_months: f64,
    pub weight_kg: f64,
}

/// A percentile reference polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct BandSeries {
    pub band: Band,
    pub points: Vec<(f64, f64)>,
}

/// Everything the chart needs for one render.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartData {
    pub timeline: Timeline,
    pub measurements: Vec<ChartPoint>,
    pub bands: Vec<BandSeries>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

/// Assemble the measurement series and up to five percentile series.
///
/// Measurements are sorted ascending by timestamp and converted to
/// kilograms. Percentile series are sampled at whole months across the
/// observed measurement range, expanded to its bracketing months and
/// clamped to the table's 0-60 coverage; they are only produced on the
/// true-age timeline, since a relative axis has nothing to line up with.
pub fn assemble(
    records: &[WeightRecord],
    birth_date: Option<NaiveDate>,
    curve: Option<&GrowthCurve>,
) -> ChartData {
    let mut sorted: Vec<&WeightRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.timestamp);

    let timeline = if birth_date.is_some() {
        Timeline::Age
    } else {
        Timeline::Relative
    };

    let measurements: Vec<ChartPoint> = match (birth_date, sorted.first()) {
        (Some(birth), _) => sorted
            .iter()
            .map(|r| ChartPoint {
                age_months: age_in_months(birth, r.timestamp),
                weight_kg: r.weight_kg(),
            })
            .collect(),
        (None, Some(first)) => {
            let origin = first.timestamp;
            sorted
                .iter()
                .map(|r| ChartPoint {
                    age_months: months_since(origin, r.timestamp),
                    weight_kg: r.weight_kg(),
                })
                .collect()
        }
        (None, None) => Vec::new(),
    };

    let bands = match (timeline, curve) {
        (Timeline::Age, Some(curve)) if !curve.is_empty() && !measurements.is_empty() => {
            band_series(curve, &measurements)
        }
        _ => Vec::new(),
    };

    ChartData {
        timeline,
        measurements,
        bands,
    }
}

fn band_series(curve: &GrowthCurve, measurements: &[ChartPoint]) -> Vec<BandSeries> {
    let min_age = measurements
        .iter()
        .map(|p| p.age_months)
        .fold(f64::INFINITY, f64::min);
    let max_age = measurements
        .iter()
        .map(|p| p.age_months)
        .fold(f64::NEG_INFINITY, f64::max);

    let start = (min_age.floor() as i64).clamp(0, MAX_REFERENCE_MONTH);
    let end = (max_age.ceil() as i64).clamp(0, MAX_REFERENCE_MONTH);

    Band::ALL
        .iter()
        .map(|band| {
            let points = (start..=end)
                .filter_map(|month| {
                    curve
                        .value_at(*band, month as f64)
                        .map(|value| (month as f64, value))
                })
                .collect();
            BandSeries {
                band: *band,
                points,
            }
        })
        .filter(|series| !series.points.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::percentile::GrowthCurvePoint;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn record(id: &str, weight_g: u32, at: DateTime<Utc>) -> WeightRecord {
        WeightRecord {
            weight_id: id.to_string(),
            weight_g,
            timestamp: at,
            note: None,
            assessment: None,
        }
    }

    fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    fn curve(months: std::ops::RangeInclusive<u32>) -> GrowthCurve {
        GrowthCurve::new(
            months
                .map(|age_months| GrowthCurvePoint {
                    age_months,
                    p3: 3.0 + age_months as f64 * 0.4,
                    p15: 3.4 + age_months as f64 * 0.4,
                    p50: 4.0 + age_months as f64 * 0.4,
                    p85: 4.6 + age_months as f64 * 0.4,
                    p97: 5.0 + age_months as f64 * 0.4,
                })
                .collect(),
        )
    }

    #[test]
    fn measurements_are_sorted_and_in_kilograms() {
        let birth = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = vec![
            record("w2", 5600, instant(2024, 3, 1)),
            record("w1", 4500, instant(2024, 2, 1)),
        ];

        let data = assemble(&records, Some(birth), None);

        assert_eq!(data.timeline, Timeline::Age);
        assert_eq!(data.measurements.len(), 2);
        assert_eq!(data.measurements[0].weight_kg, 4.5);
        assert_eq!(data.measurements[1].weight_kg, 5.6);
        assert!(data.measurements[0].age_months < data.measurements[1].age_months);
    }

    #[test]
    fn relative_timeline_without_birth_date() {
        let records = vec![
            record("w1", 4500, instant(2024, 2, 1)),
            record("w2", 5600, instant(2024, 3, 2)),
        ];

        let data = assemble(&records, None, None);

        assert_eq!(data.timeline, Timeline::Relative);
        assert_eq!(data.measurements[0].age_months, 0.0);
        assert!((data.measurements[1].age_months - 1.0).abs() < 0.01);
    }

    #[test]
    fn relative_timeline_never_gets_percentile_series() {
        let records = vec![record("w1", 4500, instant(2024, 2, 1))];
        let reference = curve(0..=60);

        let data = assemble(&records, None, Some(&reference));

        assert!(data.bands.is_empty());
    }

    #[test]
    fn band_domain_brackets_the_observed_range() {
        let birth = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = vec![
            record("w1", 4500, instant(2024, 2, 15)), // ~1.47 months
            record("w2", 6400, instant(2024, 4, 20)), // ~3.63 months
        ];
        let reference = curve(0..=60);

        let data = assemble(&records, Some(birth), Some(&reference));

        assert_eq!(data.bands.len(), 5);
        for series in &data.bands {
            assert_eq!(series.points.first().unwrap().0, 1.0);
            assert_eq!(series.points.last().unwrap().0, 4.0);
        }
    }

    #[test]
    fn band_domain_is_clamped_to_table_coverage() {
        let birth = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = vec![
            record("w1", 3300, instant(2023, 12, 28)), // before birth
            record("w2", 21000, instant(2029, 6, 1)),  // past 60 months
        ];
        let reference = curve(0..=60);

        let data = assemble(&records, Some(birth), Some(&reference));

        for series in &data.bands {
            assert_eq!(series.points.first().unwrap().0, 0.0);
            assert_eq!(series.points.last().unwrap().0, 60.0);
        }
    }

    #[test]
    fn table_gaps_are_skipped_not_invented() {
        let birth = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = vec![
            record("w1", 4500, instant(2024, 2, 1)),
            record("w2", 6400, instant(2024, 6, 1)),
        ];
        // Reference covers only months 0-3; the rest of the domain
        // produces no points rather than clamped ones.
        let reference = curve(0..=3);

        let data = assemble(&records, Some(birth), Some(&reference));

        for series in &data.bands {
            assert!(series.points.iter().all(|(age, _)| *age <= 3.0));
        }
    }

    #[test]
    fn empty_records_produce_empty_chart() {
        let data = assemble(&[], None, None);
        assert!(data.is_empty());
        assert!(data.bands.is_empty());
    }
}
