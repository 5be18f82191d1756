//! Dashboard services
//!
//! - `poller`: recurring fetch cycle and retry scheduling
//! - `dashboard`: controller owning the panel, chart state and canvas
//! - `render_service`: snapshot fields to panel text
//! - `chart_service`: chart reconciliation state machine

pub mod chart_service;
pub mod dashboard;
pub mod poller;
pub mod render_service;

pub use dashboard::{Dashboard, DashboardSettings};
pub use poller::Poller;
