//! Repository Traits
//!
//! Interfaces for persistence and code delivery. Implementations live in
//! the infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::{otp_session::OtpSession, user::User};
use crate::domain::value_object::{
    email::Email, mobile_number::MobileNumber, otp_code::OtpCode, user_name::UserName,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Find user by mobile number
    async fn find_by_mobile(&self, mobile_number: &MobileNumber) -> AuthResult<Option<User>>;

    /// Check if a mobile number is already registered
    async fn exists_by_mobile(&self, mobile_number: &MobileNumber) -> AuthResult<bool>;

    /// Mark the user as verified
    async fn mark_verified(&self, user_id: UserId) -> AuthResult<()>;

    /// Update profile fields, returning the stored user
    async fn update_profile(
        &self,
        user_id: UserId,
        name: &UserName,
        email: Option<&Email>,
    ) -> AuthResult<User>;

    /// Move the account to a new mobile number and bump the session version
    async fn change_mobile(
        &self,
        user_id: UserId,
        mobile_number: &MobileNumber,
    ) -> AuthResult<User>;

    /// Delete unverified accounts created before the cutoff
    async fn delete_stale_unverified(&self, created_before: DateTime<Utc>) -> AuthResult<u64>;
}

/// Volatile store for pending verification codes
///
/// Keys are delivery targets, optionally qualified by purpose. Storing
/// under an existing key replaces the previous session.
#[trait_variant::make(OtpStore: Send)]
pub trait LocalOtpStore {
    /// Store a session under the given key
    async fn put(&self, key: &str, session: OtpSession) -> AuthResult<()>;

    /// Fetch the session for a key
    async fn get(&self, key: &str) -> AuthResult<Option<OtpSession>>;

    /// Remove the session for a key
    async fn remove(&self, key: &str) -> AuthResult<()>;
}

/// Outbound delivery channel for verification codes
#[trait_variant::make(OtpDelivery: Send)]
pub trait LocalOtpDelivery {
    /// Deliver a code to the given mobile number
    async fn deliver(&self, mobile_number: &MobileNumber, code: &OtpCode) -> AuthResult<()>;
}
