//! Entity Module

pub mod otp_session;
pub mod user;
