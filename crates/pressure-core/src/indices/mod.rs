//! Fast and lagged pressure index models.

pub mod fast;
pub mod lagged;

pub use fast::FastIndexModel;
pub use lagged::{LagDirection, LaggedIndexModel, LaggedMode};
