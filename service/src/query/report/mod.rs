//! Reporting [`Query`]s.
//!
//! [`Query`]: crate::Query

pub mod dashboard;

pub use self::dashboard::Dashboard;
