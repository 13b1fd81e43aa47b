//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod memory;
pub mod postgres;
pub mod sms;

pub use memory::InMemoryOtpStore;
pub use postgres::PgUserRepository;
pub use sms::SmsOtpDelivery;
