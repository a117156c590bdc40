//! Event selector, normalized event and forward decision types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Category of platform event a trigger listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    #[default]
    NftCreated,
    NftTransferred,
    NftBurned,
    NftListed,
    NftSold,
    MetadataUpdated,
    OrderCreated,
    OrderCancelled,
    OrderFilled,
    BidReceived,
    TradeExecuted,
    CollectionCreated,
    CollectionUpdated,
    DepositCompleted,
    WithdrawalCompleted,
    ItemCrafted,
    PrimarySalePurchase,
    All,
}

impl EventCategory {
    pub const ALL: [EventCategory; 18] = [
        EventCategory::NftCreated,
        EventCategory::NftTransferred,
        EventCategory::NftBurned,
        EventCategory::NftListed,
        EventCategory::NftSold,
        EventCategory::MetadataUpdated,
        EventCategory::OrderCreated,
        EventCategory::OrderCancelled,
        EventCategory::OrderFilled,
        EventCategory::BidReceived,
        EventCategory::TradeExecuted,
        EventCategory::CollectionCreated,
        EventCategory::CollectionUpdated,
        EventCategory::DepositCompleted,
        EventCategory::WithdrawalCompleted,
        EventCategory::ItemCrafted,
        EventCategory::PrimarySalePurchase,
        EventCategory::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::NftCreated => "nft_created",
            EventCategory::NftTransferred => "nft_transferred",
            EventCategory::NftBurned => "nft_burned",
            EventCategory::NftListed => "nft_listed",
            EventCategory::NftSold => "nft_sold",
            EventCategory::MetadataUpdated => "metadata_updated",
            EventCategory::OrderCreated => "order_created",
            EventCategory::OrderCancelled => "order_cancelled",
            EventCategory::OrderFilled => "order_filled",
            EventCategory::BidReceived => "bid_received",
            EventCategory::TradeExecuted => "trade_executed",
            EventCategory::CollectionCreated => "collection_created",
            EventCategory::CollectionUpdated => "collection_updated",
            EventCategory::DepositCompleted => "deposit_completed",
            EventCategory::WithdrawalCompleted => "withdrawal_completed",
            EventCategory::ItemCrafted => "item_crafted",
            EventCategory::PrimarySalePurchase => "primary_sale_purchase",
            EventCategory::All => "all",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown event category '{}'", s))
    }
}

/// Optional field filters. Empty strings count as not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilters {
    pub collection_address: String,
    pub user_address: String,
    pub token_id: String,
}

/// What a webhook trigger listens for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSelector {
    pub category: EventCategory,
    #[serde(default)]
    pub filters: EventFilters,
}

impl EventSelector {
    pub fn new(category: EventCategory) -> Self {
        Self {
            category,
            filters: EventFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: EventFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// Event record handed to the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    /// Selector category that accepted the event.
    pub event: EventCategory,
    pub event_type: String,
    pub timestamp: Value,
    pub data: Value,
    pub raw: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    EventType,
    Collection,
    User,
    TokenId,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::EventType => "Event filtered out",
            DropReason::Collection => "Filtered out by collection",
            DropReason::User => "Filtered out by user",
            DropReason::TokenId => "Filtered out by token ID",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForwardDecision {
    Forward(NormalizedEvent),
    Drop(DropReason),
}

impl ForwardDecision {
    pub fn is_forward(&self) -> bool {
        matches!(self, ForwardDecision::Forward(_))
    }

    /// Metrics label.
    pub fn label(&self) -> &'static str {
        match self {
            ForwardDecision::Forward(_) => "forward",
            ForwardDecision::Drop(_) => "drop",
        }
    }
}
