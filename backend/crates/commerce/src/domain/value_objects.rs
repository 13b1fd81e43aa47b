//! Domain Value Objects
//!
//! Immutable value types for the commerce domain.

/// Purchasable item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Course,
    TestSeries,
    Library,
}

impl ItemKind {
    /// Wire and storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Course => "course",
            ItemKind::TestSeries => "testseries",
            ItemKind::Library => "library",
        }
    }

    /// Prefix used when fabricating gateway order ids
    pub fn order_prefix(&self) -> &'static str {
        match self {
            ItemKind::Course => "COURSE",
            ItemKind::TestSeries => "TESTSERIES",
            ItemKind::Library => "LIBRARY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "course" => Some(ItemKind::Course),
            "testseries" => Some(ItemKind::TestSeries),
            "library" => Some(ItemKind::Library),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog price in major currency units (rupees)
///
/// Conversion to minor units (paise) happens exactly once, when a gateway
/// order is opened. Verification never converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(i64);

impl Price {
    pub fn new(major: i64) -> Option<Self> {
        if major >= 0 { Some(Self(major)) } else { None }
    }

    pub fn major(&self) -> i64 {
        self.0
    }

    pub fn to_minor(&self) -> i64 {
        self.0 * 100
    }
}

impl From<Price> for i64 {
    fn from(p: Price) -> Self {
        p.0
    }
}

/// Entitlement row status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStatus {
    Active,
    Inactive,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Active => "active",
            PurchaseStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(PurchaseStatus::Active),
            "inactive" => Some(PurchaseStatus::Inactive),
            _ => None,
        }
    }
}

/// Library subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionPlan {
    Lifetime,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Lifetime => "lifetime",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lifetime" => Some(SubscriptionPlan::Lifetime),
            _ => None,
        }
    }
}

/// Result of an entitlement insert
///
/// A uniqueness violation on the active-row index means a concurrent or
/// repeated verification already granted the entitlement. Both outcomes
/// leave exactly one active row, so both count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    Granted,
    AlreadyGranted,
}

impl GrantOutcome {
    pub fn newly_granted(&self) -> bool {
        matches!(self, GrantOutcome::Granted)
    }
}

/// Page/limit window for list endpoints
///
/// Pages are 1-based. Out-of-range values are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u32 = 12;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Library catalog filters
///
/// Blank filters collapse to no filter.
#[derive(Debug, Clone, Default)]
pub struct EbookFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl EbookFilter {
    pub fn new(category: Option<String>, search: Option<String>) -> Self {
        let non_blank = |s: Option<String>| {
            s.map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            category: non_blank(category),
            search: non_blank(search),
        }
    }
}

/// Buyer details sent with a gateway order
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Order submitted to the payment gateway
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub order_id: String,
    /// Minor currency units (paise)
    pub amount_minor: i64,
    pub currency: String,
    pub customer: CustomerProfile,
    pub note: Option<String>,
}

/// Gateway's view of an order
#[derive(Debug, Clone)]
pub struct GatewayOrderState {
    pub order_id: String,
    /// Raw gateway status string ("ACTIVE", "PAID", "EXPIRED", ...)
    pub status: String,
    pub amount_minor: i64,
    pub payment_session_id: Option<String>,
}

impl GatewayOrderState {
    /// The one status that settles a purchase
    const SETTLED: &'static str = "PAID";

    pub fn is_paid(&self) -> bool {
        self.status == Self::SETTLED
    }
}
