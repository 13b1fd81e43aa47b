//! Infrastructure Layer
//!
//! Concrete adapters for the domain's repository and gateway traits.

pub mod gateway;
pub mod postgres;
