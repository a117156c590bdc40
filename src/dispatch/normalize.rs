//! Response normalization into flat output records.

use alloy::primitives::U256;
use serde_json::{json, Map, Value};

use crate::blockchain::types::{ConnectorError, ConnectorResult};
use crate::blockchain::units::{
    format_units, parse_block_number, parse_quantity, wei_to_gwei, ETH_DECIMALS,
};
use crate::dispatch::table::RpcShape;

/// Output record of one successful operation.
pub type OperationResult = Map<String, Value>;

/// Objects pass through; `null` becomes `{}`; anything else is wrapped.
pub fn into_record(value: Value) -> OperationResult {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => wrap(other),
    }
}

fn wrap(value: Value) -> OperationResult {
    let mut map = Map::new();
    map.insert("result".to_string(), value);
    map
}

/// Shape a JSON-RPC `result` according to the table row.
pub fn rpc_result(shape: RpcShape, result: Value) -> ConnectorResult<OperationResult> {
    match shape {
        RpcShape::Object => Ok(into_record(result)),
        RpcShape::Wrapped => Ok(wrap(result)),
        RpcShape::GasPrice => {
            let wei = parse_quantity(&result)?;
            Ok(into_record(json!({
                "gasPriceWei": wei.to_string(),
                "gasPriceGwei": wei_to_gwei(wei),
            })))
        }
        RpcShape::BlockNumber => Ok(into_record(json!({
            "blockNumber": parse_block_number(&result)?,
        }))),
    }
}

pub fn balance(address: &str, result: &Value) -> ConnectorResult<OperationResult> {
    let wei = parse_quantity(result)?;
    Ok(into_record(json!({
        "address": address,
        "balanceWei": wei.to_string(),
        "balanceEth": format_units(wei, ETH_DECIMALS),
    })))
}

/// Floor price of a collection's active listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorPrice {
    pub floor_wei: U256,
    /// Listings with a non-zero price.
    pub listings: usize,
}

impl FloorPrice {
    pub fn into_record(self, collection_address: &str) -> OperationResult {
        into_record(json!({
            "collectionAddress": collection_address,
            "totalListings": self.listings,
            "floorPriceWei": self.floor_wei.to_string(),
            "floorPriceEth": format_units(self.floor_wei, ETH_DECIMALS),
        }))
    }
}

/// Reduce a listings response (`result[*].buy[0].amount`) to its floor price.
///
/// Zero and missing amounts are not counted. An empty set yields a zero floor.
pub fn floor_price(listings: &Value) -> ConnectorResult<FloorPrice> {
    let orders = listings
        .get("result")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut prices = Vec::with_capacity(orders.len());
    for order in orders {
        let amount = order
            .get("buy")
            .and_then(|b| b.get(0))
            .and_then(|b| b.get("amount"));
        let price = match amount {
            None | Some(Value::Null) => U256::ZERO,
            Some(Value::String(s)) => U256::from_str_radix(s, 10).map_err(|_| {
                ConnectorError::upstream(format!("malformed listing amount '{}'", s))
            })?,
            Some(other) => {
                return Err(ConnectorError::upstream(format!(
                    "malformed listing amount {}",
                    other
                )))
            }
        };
        if !price.is_zero() {
            prices.push(price);
        }
    }

    Ok(FloorPrice {
        floor_wei: prices.iter().min().copied().unwrap_or(U256::ZERO),
        listings: prices.len(),
    })
}
