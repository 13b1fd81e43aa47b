//! SMS Code Delivery

use platform::sms::SmsClient;

use crate::domain::repository::OtpDelivery;
use crate::domain::value_object::{mobile_number::MobileNumber, otp_code::OtpCode};
use crate::error::AuthResult;

/// Delivers verification codes through the SMS provider
#[derive(Clone)]
pub struct SmsOtpDelivery {
    client: SmsClient,
}

impl SmsOtpDelivery {
    pub fn new(client: SmsClient) -> Self {
        Self { client }
    }
}

impl OtpDelivery for SmsOtpDelivery {
    async fn deliver(&self, mobile_number: &MobileNumber, code: &OtpCode) -> AuthResult<()> {
        let delivery_id = self
            .client
            .send_code(mobile_number.as_str(), code.as_str())
            .await?;

        tracing::info!(delivery_id = %delivery_id, "Verification SMS dispatched");

        Ok(())
    }
}
