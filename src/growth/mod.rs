//! Growth Curve Alignment
//!
//! Age labeling, percentile interpolation, and chart series assembly.

pub mod age;
pub mod percentile;
pub mod series;

pub use percentile::{Band, GrowthCurve, GrowthCurvePoint};
pub use series::{assemble, ChartData, Timeline};
