//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod assessment_card;
pub mod chart;
pub mod loading;
pub mod nav;
pub mod toast;
pub mod weight_form;
pub mod weight_list;

pub use assessment_card::AssessmentCard;
pub use chart::GrowthChart;
pub use loading::{ChartSkeleton, ListSkeleton, Loading};
pub use nav::Nav;
pub use toast::Toast;
pub use weight_form::WeightForm;
pub use weight_list::WeightList;
