//! Domain workflows for SME business-banking credit applications.
//!
//! The crate covers the journey from a priced repayment quote through credit
//! assessment to director sign-off: a pure amortization calculator with a
//! configurable pricing policy, an intake guard producing sanitized
//! application profiles, a deterministic assessment engine, and the
//! multi-signatory approval tracker with its service and HTTP router.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
