//! Unit tests for auth crate
//! Target: C0 coverage 100%, C1 coverage 80%

#[cfg(test)]
mod fakes {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::{DateTime, Utc};
    use kernel::id::UserId;
    use tokio::sync::Mutex;

    use crate::domain::entity::user::User;
    use crate::domain::repository::{OtpDelivery, UserRepository};
    use crate::domain::value_object::{
        email::Email, mobile_number::MobileNumber, otp_code::OtpCode, user_name::UserName,
    };
    use crate::error::{AuthError, AuthResult};

    /// Captures delivered codes instead of calling the SMS provider
    #[derive(Clone, Default)]
    pub struct RecordingDelivery {
        pub sent: Arc<Mutex<Vec<(String, String)>>>,
        fail: Arc<AtomicBool>,
    }

    impl RecordingDelivery {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::Relaxed);
        }

        pub async fn last_code(&self) -> Option<String> {
            self.sent.lock().await.last().map(|(_, code)| code.clone())
        }

        pub async fn sent_count(&self) -> usize {
            self.sent.lock().await.len()
        }
    }

    impl OtpDelivery for RecordingDelivery {
        async fn deliver(&self, mobile_number: &MobileNumber, code: &OtpCode) -> AuthResult<()> {
            if self.fail.load(Ordering::Relaxed) {
                return Err(AuthError::Provider("sms rejected".to_string()));
            }
            self.sent
                .lock()
                .await
                .push((mobile_number.as_str().to_string(), code.as_str().to_string()));
            Ok(())
        }
    }

    /// HashMap-backed user repository
    #[derive(Clone, Default)]
    pub struct MemoryUserRepo {
        users: Arc<Mutex<HashMap<UserId, User>>>,
    }

    impl MemoryUserRepo {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl UserRepository for MemoryUserRepo {
        async fn create(&self, user: &User) -> AuthResult<()> {
            let mut users = self.users.lock().await;
            if users
                .values()
                .any(|u| u.mobile_number == user.mobile_number)
            {
                return Err(AuthError::MobileNumberTaken);
            }
            users.insert(user.user_id, user.clone());
            Ok(())
        }

        async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
            Ok(self.users.lock().await.get(&user_id).cloned())
        }

        async fn find_by_mobile(&self, mobile_number: &MobileNumber) -> AuthResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .await
                .values()
                .find(|u| &u.mobile_number == mobile_number)
                .cloned())
        }

        async fn exists_by_mobile(&self, mobile_number: &MobileNumber) -> AuthResult<bool> {
            Ok(self
                .users
                .lock()
                .await
                .values()
                .any(|u| &u.mobile_number == mobile_number))
        }

        async fn mark_verified(&self, user_id: UserId) -> AuthResult<()> {
            if let Some(u) = self.users.lock().await.get_mut(&user_id) {
                u.is_verified = true;
                u.updated_at = Utc::now();
            }
            Ok(())
        }

        async fn update_profile(
            &self,
            user_id: UserId,
            name: &UserName,
            email: Option<&Email>,
        ) -> AuthResult<User> {
            let mut users = self.users.lock().await;
            let user = users.get_mut(&user_id).ok_or(AuthError::UserNotFound)?;
            user.name = name.clone();
            if let Some(email) = email {
                user.email = Some(email.clone());
            }
            user.updated_at = Utc::now();
            Ok(user.clone())
        }

        async fn change_mobile(
            &self,
            user_id: UserId,
            mobile_number: &MobileNumber,
        ) -> AuthResult<User> {
            let mut users = self.users.lock().await;
            let user = users.get_mut(&user_id).ok_or(AuthError::UserNotFound)?;
            user.mobile_number = mobile_number.clone();
            user.session_version += 1;
            user.updated_at = Utc::now();
            Ok(user.clone())
        }

        async fn delete_stale_unverified(&self, created_before: DateTime<Utc>) -> AuthResult<u64> {
            let mut users = self.users.lock().await;
            let before = users.len();
            users.retain(|_, u| u.is_verified || u.created_at >= created_before);
            Ok((before - users.len()) as u64)
        }
    }
}

#[cfg(test)]
mod otp_tests {
    use super::fakes::RecordingDelivery;
    use crate::application::config::AuthConfig;
    use crate::application::otp::{login_key, request_code, validate_code};
    use crate::domain::entity::otp_session::OtpSession;
    use crate::domain::repository::OtpStore;
    use crate::domain::value_object::{mobile_number::MobileNumber, otp_code::OtpCode};
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryOtpStore;

    fn mobile() -> MobileNumber {
        MobileNumber::new("9876543210").unwrap()
    }

    #[tokio::test]
    async fn test_validate_without_request_fails() {
        let store = InMemoryOtpStore::new();
        let result = validate_code(&store, &login_key(&mobile()), "123456").await;
        assert!(matches!(result, Err(AuthError::CodeNotFound)));
    }

    #[tokio::test]
    async fn test_request_then_validate_succeeds() {
        let store = InMemoryOtpStore::new();
        let delivery = RecordingDelivery::new();
        let config = AuthConfig::with_random_secret();
        let key = login_key(&mobile());

        request_code(&store, &delivery, &config, &key, &mobile())
            .await
            .unwrap();

        let code = delivery.last_code().await.unwrap();
        validate_code(&store, &key, &code).await.unwrap();
    }

    #[tokio::test]
    async fn test_code_is_single_use() {
        let store = InMemoryOtpStore::new();
        let delivery = RecordingDelivery::new();
        let config = AuthConfig::with_random_secret();
        let key = login_key(&mobile());

        request_code(&store, &delivery, &config, &key, &mobile())
            .await
            .unwrap();

        let code = delivery.last_code().await.unwrap();
        validate_code(&store, &key, &code).await.unwrap();

        let second = validate_code(&store, &key, &code).await;
        assert!(matches!(second, Err(AuthError::CodeNotFound)));
    }

    #[tokio::test]
    async fn test_new_request_supersedes_old_code() {
        let store = InMemoryOtpStore::new();
        let delivery = RecordingDelivery::new();
        let config = AuthConfig::with_random_secret();
        let key = login_key(&mobile());

        request_code(&store, &delivery, &config, &key, &mobile())
            .await
            .unwrap();
        let first_code = delivery.last_code().await.unwrap();

        request_code(&store, &delivery, &config, &key, &mobile())
            .await
            .unwrap();
        let second_code = delivery.last_code().await.unwrap();

        if first_code != second_code {
            let stale = validate_code(&store, &key, &first_code).await;
            assert!(matches!(stale, Err(AuthError::CodeMismatch)));
        }

        validate_code(&store, &key, &second_code).await.unwrap();
    }

    #[tokio::test]
    async fn test_mismatch_keeps_session() {
        let store = InMemoryOtpStore::new();
        let delivery = RecordingDelivery::new();
        let config = AuthConfig::with_random_secret();
        let key = login_key(&mobile());

        request_code(&store, &delivery, &config, &key, &mobile())
            .await
            .unwrap();
        let code = delivery.last_code().await.unwrap();

        let wrong = if code == "000000" { "000001" } else { "000000" };
        let result = validate_code(&store, &key, wrong).await;
        assert!(matches!(result, Err(AuthError::CodeMismatch)));

        // Still valid after a failed attempt
        validate_code(&store, &key, &code).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_code_is_consumed() {
        let store = InMemoryOtpStore::new();
        let key = "9876543210";
        let code = OtpCode::generate();

        store
            .put(key, OtpSession::new(code.clone(), -1))
            .await
            .unwrap();

        let expired = validate_code(&store, key, code.as_str()).await;
        assert!(matches!(expired, Err(AuthError::CodeExpired)));

        let gone = validate_code(&store, key, code.as_str()).await;
        assert!(matches!(gone, Err(AuthError::CodeNotFound)));
    }

    #[tokio::test]
    async fn test_delivery_failure_rolls_back_session() {
        let store = InMemoryOtpStore::new();
        let delivery = RecordingDelivery::new();
        delivery.set_fail(true);
        let config = AuthConfig::with_random_secret();
        let key = login_key(&mobile());

        let result = request_code(&store, &delivery, &config, &key, &mobile()).await;
        assert!(matches!(result, Err(AuthError::Provider(_))));

        // Nothing left to validate against
        let probe = validate_code(&store, &key, "123456").await;
        assert!(matches!(probe, Err(AuthError::CodeNotFound)));
        assert!(delivery.last_code().await.is_none());
    }
}

#[cfg(test)]
mod account_tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::fakes::{MemoryUserRepo, RecordingDelivery};
    use crate::application::check_session::CheckSessionUseCase;
    use crate::application::config::AuthConfig;
    use crate::application::login::{LoginInput, LoginUseCase};
    use crate::application::mobile_change::MobileChangeUseCase;
    use crate::application::refresh::{RefreshInput, RefreshSessionUseCase};
    use crate::application::register::{RegisterInput, RegisterUseCase};
    use crate::application::verify_otp::{VerifyOtpInput, VerifyOtpOutput, VerifyOtpUseCase};
    use crate::domain::entity::user::User;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{mobile_number::MobileNumber, user_name::UserName};
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryOtpStore;

    struct Harness {
        user_repo: Arc<MemoryUserRepo>,
        otp_store: Arc<InMemoryOtpStore>,
        delivery: Arc<RecordingDelivery>,
        config: Arc<AuthConfig>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                user_repo: Arc::new(MemoryUserRepo::new()),
                otp_store: Arc::new(InMemoryOtpStore::new()),
                delivery: Arc::new(RecordingDelivery::new()),
                config: Arc::new(AuthConfig::with_random_secret()),
            }
        }

        async fn register(&self, name: &str, mobile: &str) {
            RegisterUseCase::new(
                self.user_repo.clone(),
                self.otp_store.clone(),
                self.delivery.clone(),
                self.config.clone(),
            )
            .execute(RegisterInput {
                name: name.to_string(),
                mobile_number: mobile.to_string(),
            })
            .await
            .unwrap();
        }

        async fn verify(&self, mobile: &str) -> VerifyOtpOutput {
            let code = self.delivery.last_code().await.unwrap();
            VerifyOtpUseCase::new(
                self.user_repo.clone(),
                self.otp_store.clone(),
                self.config.clone(),
            )
            .execute(VerifyOtpInput {
                mobile_number: mobile.to_string(),
                code,
            })
            .await
            .unwrap()
        }

        fn check_session(&self) -> CheckSessionUseCase<MemoryUserRepo> {
            CheckSessionUseCase::new(self.user_repo.clone(), self.config.clone())
        }
    }

    const MOBILE: &str = "9876543210";

    #[tokio::test]
    async fn test_register_creates_unverified_user_and_sends_code() {
        let h = Harness::new();
        h.register("Test User", MOBILE).await;

        let mobile = MobileNumber::new(MOBILE).unwrap();
        let user = h.user_repo.find_by_mobile(&mobile).await.unwrap().unwrap();
        assert!(!user.is_verified);
        assert_eq!(user.session_version, 0);
        assert_eq!(h.delivery.sent_count().await, 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_mobile_conflict() {
        let h = Harness::new();
        h.register("First", MOBILE).await;

        let result = RegisterUseCase::new(
            h.user_repo.clone(),
            h.otp_store.clone(),
            h.delivery.clone(),
            h.config.clone(),
        )
        .execute(RegisterInput {
            name: "Second".to_string(),
            mobile_number: MOBILE.to_string(),
        })
        .await;

        assert!(matches!(result, Err(AuthError::MobileNumberTaken)));
    }

    #[tokio::test]
    async fn test_register_recycles_stale_unverified_user() {
        let h = Harness::new();

        let mut stale = User::new(
            UserName::new("Stale").unwrap(),
            MobileNumber::new(MOBILE).unwrap(),
        );
        stale.created_at = Utc::now() - chrono::Duration::minutes(11);
        h.user_repo.create(&stale).await.unwrap();

        // Old unverified registration no longer blocks the number
        h.register("Fresh", MOBILE).await;

        let mobile = MobileNumber::new(MOBILE).unwrap();
        let user = h.user_repo.find_by_mobile(&mobile).await.unwrap().unwrap();
        assert_eq!(user.name.as_str(), "Fresh");
    }

    #[tokio::test]
    async fn test_verify_marks_verified_and_issues_working_tokens() {
        let h = Harness::new();
        h.register("Test User", MOBILE).await;
        let output = h.verify(MOBILE).await;

        assert!(output.user.is_verified);

        let current = h
            .check_session()
            .execute(&output.token_pair.access_token)
            .await
            .unwrap();
        assert_eq!(current.user_id, output.user.user_id);
        assert_eq!(current.mobile_number.as_str(), MOBILE);
        assert!(!current.is_admin);
    }

    #[tokio::test]
    async fn test_login_unknown_mobile_not_found() {
        let h = Harness::new();

        let result = LoginUseCase::new(
            h.user_repo.clone(),
            h.otp_store.clone(),
            h.delivery.clone(),
            h.config.clone(),
        )
        .execute(LoginInput {
            mobile_number: MOBILE.to_string(),
        })
        .await;

        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_access_token_rejected_by_refresh_and_vice_versa() {
        let h = Harness::new();
        h.register("Test User", MOBILE).await;
        let output = h.verify(MOBILE).await;

        let refresh = RefreshSessionUseCase::new(h.user_repo.clone(), h.config.clone());

        let wrong_kind = refresh
            .execute(RefreshInput {
                refresh_token: output.token_pair.access_token.clone(),
            })
            .await;
        assert!(matches!(wrong_kind, Err(AuthError::TokenInvalid)));

        let as_access = h
            .check_session()
            .execute(&output.token_pair.refresh_token)
            .await;
        assert!(matches!(as_access, Err(AuthError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_refresh_rotates_pair() {
        let h = Harness::new();
        h.register("Test User", MOBILE).await;
        let output = h.verify(MOBILE).await;

        let pair = RefreshSessionUseCase::new(h.user_repo.clone(), h.config.clone())
            .execute(RefreshInput {
                refresh_token: output.token_pair.refresh_token,
            })
            .await
            .unwrap();

        let current = h.check_session().execute(&pair.access_token).await.unwrap();
        assert_eq!(current.user_id, output.user.user_id);
    }

    #[tokio::test]
    async fn test_version_bump_invalidates_outstanding_tokens() {
        let h = Harness::new();
        h.register("Test User", MOBILE).await;
        let output = h.verify(MOBILE).await;

        let new_mobile = MobileNumber::new("9123456780").unwrap();
        h.user_repo
            .change_mobile(output.user.user_id, &new_mobile)
            .await
            .unwrap();

        let stale_access = h
            .check_session()
            .execute(&output.token_pair.access_token)
            .await;
        assert!(matches!(stale_access, Err(AuthError::TokenInvalid)));

        let stale_refresh = RefreshSessionUseCase::new(h.user_repo.clone(), h.config.clone())
            .execute(RefreshInput {
                refresh_token: output.token_pair.refresh_token,
            })
            .await;
        assert!(matches!(stale_refresh, Err(AuthError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_mobile_change_flow() {
        let h = Harness::new();
        h.register("Test User", MOBILE).await;
        let output = h.verify(MOBILE).await;

        const NEW_MOBILE: &str = "9123456780";

        let use_case = MobileChangeUseCase::new(
            h.user_repo.clone(),
            h.otp_store.clone(),
            h.delivery.clone(),
            h.config.clone(),
        );

        use_case
            .request(output.user.user_id, NEW_MOBILE.to_string())
            .await
            .unwrap();

        let code = h.delivery.last_code().await.unwrap();
        let changed = use_case
            .confirm(output.user.user_id, NEW_MOBILE.to_string(), code)
            .await
            .unwrap();

        assert_eq!(changed.user.mobile_number.as_str(), NEW_MOBILE);
        assert_eq!(changed.user.session_version, output.user.session_version + 1);

        // Fresh pair works, pre-change token does not
        let current = h
            .check_session()
            .execute(&changed.token_pair.access_token)
            .await
            .unwrap();
        assert_eq!(current.mobile_number.as_str(), NEW_MOBILE);

        let stale = h
            .check_session()
            .execute(&output.token_pair.access_token)
            .await;
        assert!(matches!(stale, Err(AuthError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_mobile_change_to_taken_number_conflict() {
        let h = Harness::new();
        h.register("First", MOBILE).await;
        let first = h.verify(MOBILE).await;

        const OTHER: &str = "9123456780";
        h.register("Second", OTHER).await;

        let use_case = MobileChangeUseCase::new(
            h.user_repo.clone(),
            h.otp_store.clone(),
            h.delivery.clone(),
            h.config.clone(),
        );

        let result = use_case.request(first.user.user_id, OTHER.to_string()).await;
        assert!(matches!(result, Err(AuthError::MobileNumberTaken)));
    }
}

#[cfg(test)]
mod models_tests {
    use crate::presentation::dto::*;

    #[test]
    fn test_register_request_deserialization() {
        let json = r#"{"name":"Test User","mobileNumber":"9876543210"}"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.name, "Test User");
        assert_eq!(request.mobile_number, "9876543210");
    }

    #[test]
    fn test_verify_otp_request_deserialization() {
        let json = r#"{"mobileNumber":"9876543210","code":"123456"}"#;
        let request: VerifyOtpRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.mobile_number, "9876543210");
        assert_eq!(request.code, "123456");
    }

    #[test]
    fn test_update_profile_request_email_optional() {
        let json = r#"{"name":"Test User"}"#;
        let request: UpdateProfileRequest = serde_json::from_str(json).unwrap();
        assert!(request.email.is_none());

        let json = r#"{"name":"Test User","email":"user@example.com"}"#;
        let request: UpdateProfileRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn test_user_response_serialization() {
        use crate::domain::entity::user::User;
        use crate::domain::value_object::{mobile_number::MobileNumber, user_name::UserName};

        let user = User::new(
            UserName::new("Test User").unwrap(),
            MobileNumber::new("9876543210").unwrap(),
        );
        let response = UserResponse::from_user(&user);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("mobileNumber"));
        assert!(json.contains("isVerified"));
        assert!(json.contains("isAdmin"));
        assert!(json.contains("createdAt"));
        assert!(json.contains(r#""email":null"#));
    }

    #[test]
    fn test_auth_token_response_serialization() {
        use crate::domain::entity::user::User;
        use crate::domain::value_object::{mobile_number::MobileNumber, user_name::UserName};

        let user = User::new(
            UserName::new("Test User").unwrap(),
            MobileNumber::new("9876543210").unwrap(),
        );
        let response = AuthTokenResponse {
            token: "a.b".to_string(),
            refresh_token: "c.d".to_string(),
            user: UserResponse::from_user(&user),
        };
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains(r#""token":"a.b""#));
        assert!(json.contains(r#""refreshToken":"c.d""#));
        assert!(json.contains(r#""user":"#));
    }

    #[test]
    fn test_message_response_serialization() {
        let response = MessageResponse {
            message: "Verification code sent".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""message":"Verification code sent""#));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(AuthError, StatusCode)> = vec![
            (
                AuthError::Validation("bad input".into()),
                StatusCode::BAD_REQUEST,
            ),
            (AuthError::UserNotFound, StatusCode::NOT_FOUND),
            (AuthError::MobileNumberTaken, StatusCode::CONFLICT),
            (AuthError::CodeNotFound, StatusCode::NOT_FOUND),
            (AuthError::CodeExpired, StatusCode::GONE),
            (AuthError::CodeMismatch, StatusCode::UNAUTHORIZED),
            (AuthError::TokenInvalid, StatusCode::UNAUTHORIZED),
            (
                AuthError::Provider("timeout".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AuthError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_error_display() {
        assert!(AuthError::CodeExpired.to_string().contains("expired"));
        assert!(AuthError::MobileNumberTaken.to_string().contains("mobile"));
        assert!(AuthError::TokenInvalid.to_string().contains("token"));
    }
}

#[cfg(test)]
mod config_tests {
    use std::time::Duration;

    use crate::application::config::AuthConfig;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();

        assert_eq!(config.access_ttl, Duration::from_secs(86_400));
        assert_eq!(config.refresh_ttl, Duration::from_secs(604_800));
        assert_eq!(config.otp_ttl, Duration::from_secs(600));
        assert_eq!(config.unverified_grace, Duration::from_secs(600));
        assert_eq!(config.token_secret, [0u8; 32]);
    }

    #[test]
    fn test_with_random_secret() {
        let config1 = AuthConfig::with_random_secret();
        let config2 = AuthConfig::with_random_secret();

        assert_ne!(config1.token_secret, config2.token_secret);
        assert!(config1.token_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_ttl_accessors() {
        let config = AuthConfig::default();

        assert_eq!(config.otp_ttl_ms(), 600_000);
        assert_eq!(config.access_ttl_secs(), 86_400);
        assert_eq!(config.refresh_ttl_secs(), 604_800);
    }
}
