//! Value Object Module

pub mod email;
pub mod mobile_number;
pub mod otp_code;
pub mod user_name;
