//! Shift anomaly detection for badge-swipe attendance auditing.
//!
//! This crate groups raw swipes into day and night shift instances, removes
//! repeated badge reads, and checks every shift against attendance rules:
//! lateness, early departure, long outings, unpaired swipes and overtime
//! that falls short of its authorization. Approved leave suppresses the
//! anomalies it covers.
//!
//! The entry point is [`detection::run_audit`]; [`api::create_router`]
//! exposes the same run over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
