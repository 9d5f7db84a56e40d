//! Percentile Interpolation
//!
//! Estimates WHO reference weights at fractional ages by linear
//! interpolation between the integer-month table entries.

use std::collections::BTreeMap;

/// One of the five WHO percentile bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    P3,
    P15,
    P50,
    P85,
    P97,
}

impl Band {
    /// All bands in plotting order (outermost first, median last).
    pub const ALL: [Band; 5] = [Band::P3, Band::P15, Band::P50, Band::P85, Band::P97];

    pub fn label(&self) -> &'static str {
        match self {
            Band::P3 => "P3",
            Band::P15 => "P15",
            Band::P50 => "P50",
            Band::P85 => "P85",
            Band::P97 => "P97",
        }
    }
}

/// A single row of the WHO weight-for-age reference table.
/// Values are kilograms.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GrowthCurvePoint {
    pub age_months: u32,
    pub p3: f64,
    pub p15: f64,
    pub p50: f64,
    pub p85: f64,
    pub p97: f64,
}

impl GrowthCurvePoint {
    pub fn value(&self, band: Band) -> f64 {
        match band {
            Band::P3 => self.p3,
            Band::P15 => self.p15,
            Band::P50 => self.p50,
            Band::P85 => self.p85,
            Band::P97 => self.p97,
        }
    }
}

/// WHO reference table keyed by integer age in months.
///
/// The table is read-only; gaps are possible and lookups outside the
/// covered range simply miss. Output is monotonic in age wherever the
/// table itself is monotonic, which holds for the WHO growth tables but
/// is not verified here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GrowthCurve {
    points: BTreeMap<u32, GrowthCurvePoint>,
}

impl GrowthCurve {
    pub fn new(points: Vec<GrowthCurvePoint>) -> Self {
        Self {
            points: points.into_iter().map(|p| (p.age_months, p)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn entry(&self, month: i64) -> Option<&GrowthCurvePoint> {
        u32::try_from(month).ok().and_then(|m| self.points.get(&m))
    }

    /// Estimated value for `band` at a fractional `age_months`.
    ///
    /// Integer ages read the table directly. Fractional ages interpolate
    /// linearly between the bracketing whole months when both are
    /// present; when only one bracket exists its value is used as-is.
    /// Ages with no bracket in the table (including negative ages and
    /// ages past the table's end) yield `None` rather than clamping.
    pub fn value_at(&self, band: Band, age_months: f64) -> Option<f64> {
        if !age_months.is_finite() {
            return None;
        }

        let lower = age_months.floor() as i64;
        let upper = age_months.ceil() as i64;

        if lower == upper {
            return self.entry(lower).map(|p| p.value(band));
        }

        let ratio = age_months - lower as f64;
        match (self.entry(lower), self.entry(upper)) {
            (Some(lo), Some(hi)) => {
                Some(lo.value(band) * (1.0 - ratio) + hi.value(band) * ratio)
            }
            (Some(lo), None) => Some(lo.value(band)),
            (None, Some(hi)) => Some(hi.value(band)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(age_months: u32, p50: f64) -> GrowthCurvePoint {
        GrowthCurvePoint {
            age_months,
            p3: p50 - 1.0,
            p15: p50 - 0.5,
            p50,
            p85: p50 + 0.5,
            p97: p50 + 1.0,
        }
    }

    fn table(rows: &[(u32, f64)]) -> GrowthCurve {
        GrowthCurve::new(rows.iter().map(|(m, v)| point(*m, *v)).collect())
    }

    #[test]
    fn integer_age_reads_table_exactly() {
        let curve = table(&[(2, 5.0), (3, 5.6)]);
        assert_eq!(curve.value_at(Band::P50, 2.0), Some(5.0));
        assert_eq!(curve.value_at(Band::P50, 3.0), Some(5.6));
        assert_eq!(curve.value_at(Band::P3, 2.0), Some(4.0));
    }

    #[test]
    fn integer_age_missing_from_table_is_none() {
        let curve = table(&[(2, 5.0), (4, 6.1)]);
        assert_eq!(curve.value_at(Band::P50, 3.0), None);
    }

    #[test]
    fn midpoint_is_the_arithmetic_mean() {
        let curve = table(&[(2, 5.0), (3, 5.6)]);
        let v = curve.value_at(Band::P50, 2.5).unwrap();
        assert!((v - 5.3).abs() < 1e-9);
    }

    #[test]
    fn interpolation_weights_by_fraction() {
        let curve = table(&[(1, 4.0), (2, 5.0)]);
        let v = curve.value_at(Band::P50, 1.25).unwrap();
        assert!((v - 4.25).abs() < 1e-9);
    }

    #[test]
    fn single_present_bracket_is_used_directly() {
        let curve = table(&[(2, 5.0)]);
        assert_eq!(curve.value_at(Band::P50, 2.4), Some(5.0));
        assert_eq!(curve.value_at(Band::P50, 1.8), Some(5.0));
    }

    #[test]
    fn no_bracket_yields_none() {
        let curve = table(&[(2, 5.0), (3, 5.6)]);
        assert_eq!(curve.value_at(Band::P50, 7.5), None);
        assert_eq!(curve.value_at(Band::P50, -0.5), None);
        assert_eq!(curve.value_at(Band::P50, 61.0), None);
    }

    #[test]
    fn empty_table_is_always_none() {
        let curve = GrowthCurve::default();
        assert!(curve.is_empty());
        assert_eq!(curve.value_at(Band::P50, 0.0), None);
    }

    #[test]
    fn monotonic_where_table_is_monotonic() {
        let curve = table(&[(0, 3.3), (1, 4.5), (2, 5.6), (3, 6.4)]);
        let mut previous = f64::NEG_INFINITY;
        let mut age = 0.0;
        while age <= 3.0 {
            let v = curve.value_at(Band::P50, age).unwrap();
            assert!(v >= previous);
            previous = v;
            age += 0.1;
        }
    }
}
