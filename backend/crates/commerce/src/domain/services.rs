//! Domain Services
//!
//! Pure logic for gateway order id fabrication.

use crate::domain::value_objects::ItemKind;

/// Build a globally unique gateway order id
///
/// Shape: `{KIND}_{item}_{ms}`. The millisecond suffix makes repeated
/// purchase attempts for the same item distinct orders.
pub fn build_order_id(kind: ItemKind, item_ref: &str, now_ms: i64) -> String {
    sanitize_order_id(&format!("{}_{}_{}", kind.order_prefix(), item_ref, now_ms))
}

/// Replace anything outside `[A-Za-z0-9_-]` with `_`
///
/// The gateway rejects order ids with other characters.
pub fn sanitize_order_id(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
