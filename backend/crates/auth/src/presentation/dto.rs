//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::user::User;

// ============================================================================
// Registration & Login
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub mobile_number: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub mobile_number: String,
}

/// Verify OTP request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub mobile_number: String,
    pub code: String,
}

/// Resend OTP request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpRequest {
    pub mobile_number: String,
}

// ============================================================================
// Tokens
// ============================================================================

/// Refresh request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response for token-issuing endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

/// Response for POST /auth/refresh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub token: String,
    pub refresh_token: String,
}

// ============================================================================
// Profile
// ============================================================================

/// Update profile request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Request a mobile change code
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileChangeRequest {
    pub new_mobile_number: String,
}

/// Confirm a mobile change
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileChangeConfirmRequest {
    pub new_mobile_number: String,
    pub code: String,
}

// ============================================================================
// Shared
// ============================================================================

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// User as presented to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub mobile_number: String,
    pub email: Option<String>,
    pub is_verified: bool,
    pub is_admin: bool,
    pub created_at: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.user_id.into_uuid(),
            name: user.name.as_str().to_string(),
            mobile_number: user.mobile_number.as_str().to_string(),
            email: user.email.as_ref().map(|e| e.as_str().to_string()),
            is_verified: user.is_verified,
            is_admin: user.is_admin,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}
