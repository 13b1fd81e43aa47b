//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Course, TestSeries, EBook, Purchase, LibrarySubscription)
//! - Domain value objects (ItemKind, Price, Pagination, gateway order types)
//! - Domain services (order id fabrication)
//! - Repository and gateway traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
