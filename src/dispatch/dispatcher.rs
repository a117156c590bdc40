//! Operation dispatcher.
//!
//! # Responsibilities
//! - Resolve (resource, operation) through the static table
//! - Fill path templates, query strings and bodies from item parameters
//! - Make exactly one outbound call per operation (none for local ones)
//! - Normalize the response into an `OperationResult`

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::blockchain::client::{ImmutableClient, RpcCall};
use crate::blockchain::network::NetworkProfile;
use crate::blockchain::types::{ConnectorError, ConnectorResult};
use crate::blockchain::units::{
    block_tag, eth_to_wei, is_valid_address, parse_block_number, parse_quantity, wei_to_eth,
};
use crate::config::ConnectorConfig;
use crate::dispatch::normalize::{self, floor_price, into_record, OperationResult};
use crate::dispatch::params::Params;
use crate::dispatch::table::{
    path_segments, resolve, BodyShape, Call, LocalOp, OperationSpec, QueryValue,
    RpcParams,
};
use crate::observability::metrics;

const STAKING_INFO_MESSAGE: &str = "Staking info endpoint - configure via Immutable Hub";

/// One processed item: which operation to run and with what parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRequest {
    pub resource: String,
    pub operation: String,
    #[serde(default)]
    pub params: Params,
}

impl OperationRequest {
    pub fn new(resource: impl Into<String>, operation: impl Into<String>, params: Params) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
            params,
        }
    }
}

/// Stateless dispatcher bound to one network and API key.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: ImmutableClient,
}

impl Dispatcher {
    pub fn new(client: ImmutableClient) -> Self {
        Self { client }
    }

    /// Dispatcher for the configured network, API key and timeout.
    pub fn from_config(config: &ConnectorConfig) -> ConnectorResult<Self> {
        let client = ImmutableClient::new(
            config.profile(),
            config.credentials.api_key().map(str::to_string),
            Duration::from_secs(config.http.timeout_secs),
        )?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &ImmutableClient {
        &self.client
    }

    pub fn profile(&self) -> &NetworkProfile {
        self.client.profile()
    }

    /// Run one operation.
    pub async fn dispatch(&self, request: &OperationRequest) -> ConnectorResult<OperationResult> {
        let start = Instant::now();
        let result = match resolve(&request.resource, &request.operation) {
            Ok(spec) => self.execute(spec, &request.params).await,
            Err(e) => Err(e),
        };

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::record_operation(&request.resource, &request.operation, outcome, start);

        if let Err(e) = &result {
            tracing::debug!(
                resource = %request.resource,
                operation = %request.operation,
                error = %e,
                "Operation failed"
            );
        }
        result
    }

    async fn execute(
        &self,
        spec: &OperationSpec,
        params: &Params,
    ) -> ConnectorResult<OperationResult> {
        let profile = self.client.profile();
        if spec.requires_rpc() && !profile.supports_rpc() {
            return Err(ConnectorError::RpcUnavailable {
                network: profile.network,
            });
        }

        match spec.call {
            Call::Rest {
                method,
                path,
                query,
                body,
            } => {
                let segments = path_segments(path, &profile.chain_name, params)?;
                let query = build_query(query, params)?;
                let body = build_body(body, params)?;
                let response = self
                    .rest(method.into(), &segments, &query, body.as_ref())
                    .await?;
                Ok(into_record(response))
            }
            Call::Rpc {
                method,
                params: param_shape,
                shape,
            } => {
                let rpc_params = build_rpc_params(param_shape, params)?;
                let result = self.client.rpc(method, rpc_params).await?;
                normalize::rpc_result(shape, result)
            }
            Call::Balance => self.balance(params).await,
            Call::CollectionStats => self.collection_stats(params).await,
            Call::NetworkStatus => self.network_status().await,
            Call::Local(op) => local(op, params),
        }
    }

    async fn rest(
        &self,
        method: Method,
        segments: &[String],
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> ConnectorResult<Value> {
        let url = self.client.api_url(segments)?;
        self.client.rest(method, url, query, body).await
    }

    async fn balance(&self, params: &Params) -> ConnectorResult<OperationResult> {
        let address = params.str("address")?;
        if self.client.profile().supports_rpc() {
            let result = self
                .client
                .rpc("eth_getBalance", vec![json!(address), json!("latest")])
                .await?;
            normalize::balance(&address, &result)
        } else {
            let segments = vec!["v2".to_string(), "balances".to_string(), address];
            let response = self.rest(Method::GET, &segments, &[], None).await?;
            Ok(into_record(response))
        }
    }

    async fn collection_stats(&self, params: &Params) -> ConnectorResult<OperationResult> {
        let collection_address = params.str("collectionAddress")?;
        let segments = path_segments(
            "/v1/chains/{chain}/orders/listings",
            &self.client.profile().chain_name,
            params,
        )?;
        let query = vec![
            ("sell_item_contract_address".to_string(), collection_address.clone()),
            ("status".to_string(), "ACTIVE".to_string()),
            ("page_size".to_string(), "100".to_string()),
        ];
        let listings = self.rest(Method::GET, &segments, &query, None).await?;
        let floor = floor_price(&listings)?;

        tracing::debug!(
            collection = %collection_address,
            listings = floor.listings,
            floor_wei = %floor.floor_wei,
            "Collection floor computed"
        );
        Ok(floor.into_record(&collection_address))
    }

    async fn network_status(&self) -> ConnectorResult<OperationResult> {
        let profile = self.client.profile();
        if !profile.supports_rpc() {
            return Ok(into_record(json!({
                "network": profile.chain_name,
                "chainId": profile.chain_id,
                "apiUrl": profile.api_url,
            })));
        }

        let calls = [
            RpcCall {
                method: "eth_blockNumber",
                params: Vec::new(),
            },
            RpcCall {
                method: "eth_gasPrice",
                params: Vec::new(),
            },
        ];
        let results = self.client.rpc_batch(&calls).await?;
        let (block, gas) = match results.as_slice() {
            [block, gas] => (block, gas),
            _ => return Err(ConnectorError::upstream("unexpected RPC batch size")),
        };

        Ok(into_record(json!({
            "network": profile.chain_name,
            "chainId": profile.chain_id,
            "blockNumber": parse_block_number(block)?,
            "gasPriceWei": parse_quantity(gas)?.to_string(),
        })))
    }
}

fn build_query(
    query: &[(&'static str, QueryValue)],
    params: &Params,
) -> ConnectorResult<Vec<(String, String)>> {
    query
        .iter()
        .map(|(key, value)| {
            let value = match *value {
                QueryValue::Limit => params.limit()?.to_string(),
                QueryValue::Param(name) => params.str(name)?,
                QueryValue::Fixed(v) => v.to_string(),
            };
            Ok((key.to_string(), value))
        })
        .collect()
}

fn build_body(shape: BodyShape, params: &Params) -> ConnectorResult<Option<Value>> {
    match shape {
        BodyShape::None => Ok(None),
        BodyShape::MintOne => {
            let metadata = params.json("nftMetadata")?;
            let owner = params.str("ownerAddress")?;
            Ok(Some(json!({
                "assets": [{ "metadata": metadata, "owner_address": owner }],
            })))
        }
        BodyShape::MintBatch => {
            let assets = params.json("nftsToMint")?;
            if !assets.is_array() {
                return Err(ConnectorError::validation("'nftsToMint' must be a JSON array"));
            }
            Ok(Some(json!({ "assets": assets })))
        }
    }
}

fn build_rpc_params(shape: RpcParams, params: &Params) -> ConnectorResult<Vec<Value>> {
    Ok(match shape {
        RpcParams::None => Vec::new(),
        RpcParams::TxHash => vec![json!(params.str("transactionHash")?)],
        RpcParams::BlockByNumber => {
            let block = params.str_or("blockNumber", "latest")?;
            vec![json!(block_tag(&block)?), json!(false)]
        }
        RpcParams::ContractCall => vec![
            json!({
                "to": params.str("contractAddress")?,
                "data": params.str("callData")?,
            }),
            json!("latest"),
        ],
    })
}

fn local(op: LocalOp, params: &Params) -> ConnectorResult<OperationResult> {
    let record = match op {
        LocalOp::ValidateAddress => {
            let address = params.str("address")?;
            json!({ "isValid": is_valid_address(&address), "address": address })
        }
        LocalOp::WeiToEth => {
            let value = params.str("value")?;
            json!({ "eth": wei_to_eth(&value)?, "wei": value })
        }
        LocalOp::EthToWei => {
            let value = params.str("value")?;
            json!({ "wei": eth_to_wei(&value)?.to_string(), "eth": value })
        }
        LocalOp::StakingInfo => json!({ "message": STAKING_INFO_MESSAGE }),
    };
    Ok(into_record(record))
}
