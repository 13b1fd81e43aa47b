//! User Entity
//!
//! Core identity record. The mobile number is the login anchor;
//! everything else is profile data.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, mobile_number::MobileNumber, user_name::UserName,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Display name
    pub name: UserName,
    /// Login identifier (unique)
    pub mobile_number: MobileNumber,
    /// Optional contact email
    pub email: Option<Email>,
    /// Set once the first one-time code is validated
    pub is_verified: bool,
    /// Grants the admin surface
    pub is_admin: bool,
    /// Incremented on credential changes; tokens carry the version
    /// they were issued under and stop validating once it moves
    pub session_version: i32,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new unverified user
    pub fn new(name: UserName, mobile_number: MobileNumber) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name,
            mobile_number,
            email: None,
            is_verified: false,
            is_admin: false,
            session_version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
