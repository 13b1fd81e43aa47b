//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64)
//! - Client identification helpers (IP extraction)
//! - SMS delivery client (transactional OTP messages)
//! - Payment gateway client (hosted checkout orders)
//! - File storage backends (local disk, HTTP object bucket)

pub mod client;
pub mod crypto;
pub mod payment;
pub mod sms;
pub mod storage;
