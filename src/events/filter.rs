//! Event filter: one generic procedure driven by two static tables.
//!
//! # Data Flow
//! ```text
//! raw payload
//!     → event type (`type`, else `event_type`, else "unknown")
//!     → category allow-list (skipped for `all`)
//!     → field filters in table order (collection, user, token)
//!     → NormalizedEvent
//! ```
//!
//! Several categories share a raw type (`order.created` feeds listings,
//! orders and bids alike). The upstream tags do not distinguish them.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::events::types::{
    DropReason, EventCategory, EventFilters, EventSelector, ForwardDecision, NormalizedEvent,
};

const UNKNOWN_TYPE: &str = "unknown";

/// Raw upstream types accepted by a category. `All` accepts everything.
pub fn allowed_types(category: EventCategory) -> &'static [&'static str] {
    match category {
        EventCategory::NftCreated => &["nft.created", "mint.created"],
        EventCategory::NftTransferred => &["nft.transferred", "transfer.created"],
        EventCategory::NftBurned => &["nft.burned"],
        EventCategory::NftListed => &["order.created"],
        EventCategory::NftSold => &["trade.created"],
        EventCategory::MetadataUpdated => &["nft.updated"],
        EventCategory::OrderCreated => &["order.created"],
        EventCategory::OrderCancelled => &["order.cancelled"],
        EventCategory::OrderFilled => &["order.filled"],
        EventCategory::BidReceived => &["order.created"],
        EventCategory::TradeExecuted => &["trade.created"],
        EventCategory::CollectionCreated => &["collection.created"],
        EventCategory::CollectionUpdated => &["collection.updated"],
        EventCategory::DepositCompleted => &["deposit.created", "deposit.updated"],
        EventCategory::WithdrawalCompleted => &["withdrawal.created", "withdrawal.updated"],
        EventCategory::ItemCrafted => &["mint.created"],
        EventCategory::PrimarySalePurchase => &["trade.created"],
        EventCategory::All => &[],
    }
}

/// One configurable field filter and the payload fields that can satisfy it.
pub struct FieldFilter {
    pub value: fn(&EventFilters) -> &str,
    pub fields: &'static [&'static str],
    pub reason: DropReason,
}

fn collection_filter(filters: &EventFilters) -> &str {
    &filters.collection_address
}

fn user_filter(filters: &EventFilters) -> &str {
    &filters.user_address
}

fn token_filter(filters: &EventFilters) -> &str {
    &filters.token_id
}

pub static FIELD_FILTERS: [FieldFilter; 3] = [
    FieldFilter {
        value: collection_filter,
        fields: &["collection_address", "contract_address", "token_address"],
        reason: DropReason::Collection,
    },
    FieldFilter {
        value: user_filter,
        fields: &["user", "from", "to", "owner"],
        reason: DropReason::User,
    },
    FieldFilter {
        value: token_filter,
        fields: &["token_id"],
        reason: DropReason::TokenId,
    },
];

/// Decide whether a raw webhook payload is forwarded. Never fails.
pub fn filter(selector: &EventSelector, payload: &Value) -> ForwardDecision {
    let event_type = event_type(payload);

    if selector.category != EventCategory::All
        && !allowed_types(selector.category)
            .iter()
            .any(|allowed| *allowed == event_type)
    {
        return ForwardDecision::Drop(DropReason::EventType);
    }

    let data = payload.get("data").filter(|data| is_present(data));
    for rule in &FIELD_FILTERS {
        let wanted = (rule.value)(&selector.filters);
        if wanted.is_empty() {
            continue;
        }
        let matched = data.is_some_and(|data| {
            rule.fields
                .iter()
                .any(|field| data.get(*field).and_then(Value::as_str) == Some(wanted))
        });
        if !matched {
            return ForwardDecision::Drop(rule.reason);
        }
    }

    let timestamp = match payload.get("timestamp") {
        Some(ts) if is_present(ts) => ts.clone(),
        _ => Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    };

    ForwardDecision::Forward(NormalizedEvent {
        event: selector.category,
        event_type: event_type.to_string(),
        timestamp,
        data: data.cloned().unwrap_or_else(|| payload.clone()),
        raw: payload.clone(),
    })
}

fn event_type(payload: &Value) -> &str {
    non_empty_str(payload, "type")
        .or_else(|| non_empty_str(payload, "event_type"))
        .unwrap_or(UNKNOWN_TYPE)
}

fn non_empty_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Empty strings, zero, `false` and `null` count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
