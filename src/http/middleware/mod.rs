//! Request middleware.

pub mod fault_injection;
pub mod metrics;

pub use fault_injection::{inject_faults, Fault, FaultInjector};
pub use metrics::track_http_metrics;
