//! Application Configuration
//!
//! Configuration for the commerce application layer.

/// Commerce application configuration
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    /// ISO currency code for gateway orders
    pub currency: String,
    /// Library lifetime plan price in major units (rupees)
    pub library_plan_price: i64,
    /// Note attached to library plan orders
    pub library_order_note: String,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            library_plan_price: 499,
            library_order_note: "Digital Library Lifetime Access".to_string(),
        }
    }
}

impl CommerceConfig {
    /// Library plan price in minor units (paise)
    pub fn library_plan_price_minor(&self) -> i64 {
        self.library_plan_price * 100
    }
}
