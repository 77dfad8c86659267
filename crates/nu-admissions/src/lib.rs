//! Admissions portal engine: stackable tuition waivers, fee derivation,
//! student identifier issuance and transfer-credit CGPA combination.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
