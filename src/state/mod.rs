//! State Management
//!
//! Application session and global reactive state.

pub mod global;
pub mod session;

pub use global::{provide_global_state, GlobalState, Subject, WeightRecord};
pub use session::Session;
