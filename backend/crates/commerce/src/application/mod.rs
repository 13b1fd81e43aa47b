//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod catalog;
pub mod config;
pub mod create_order;
pub mod entitlements;
pub mod library;
pub mod manage_library;
pub mod verify_purchase;
