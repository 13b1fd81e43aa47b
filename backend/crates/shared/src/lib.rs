//! Shared Kernel - Domain-crossing minimal core
//!
//! The smallest vocabulary shared by every domain crate:
//! - Unified error type and its HTTP-facing classification
//! - Typed entity ids
//!
//! **Design Principle**: nothing here may depend on a domain crate, and
//! only things with one stable meaning across auth and commerce belong.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
