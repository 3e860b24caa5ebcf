//! OpenVehicleAnalytics server library
//!
//! Exposes the API router, shared state, and the background sampler for
//! integration testing.

pub mod api;
pub mod sampler;
pub mod state;
