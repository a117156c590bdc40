//! Static (resource, operation) dispatch table.
//!
//! Every supported operation is one `OperationSpec` row describing the single
//! outbound call it makes. Adding an endpoint means adding a row; the
//! dispatcher itself does not change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::blockchain::types::{ConnectorError, ConnectorResult};
use crate::dispatch::params::Params;

/// Top-level category of platform functionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Activity,
    Collection,
    Crafting,
    Deposit,
    Exchange,
    Metadata,
    Minting,
    Nft,
    Order,
    Passport,
    PrimarySales,
    Project,
    Staking,
    Trade,
    Utility,
    Wallet,
    Withdrawal,
    Zkevm,
}

impl Resource {
    pub const ALL: [Resource; 18] = [
        Resource::Activity,
        Resource::Collection,
        Resource::Crafting,
        Resource::Deposit,
        Resource::Exchange,
        Resource::Metadata,
        Resource::Minting,
        Resource::Nft,
        Resource::Order,
        Resource::Passport,
        Resource::PrimarySales,
        Resource::Project,
        Resource::Staking,
        Resource::Trade,
        Resource::Utility,
        Resource::Wallet,
        Resource::Withdrawal,
        Resource::Zkevm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Activity => "activity",
            Resource::Collection => "collection",
            Resource::Crafting => "crafting",
            Resource::Deposit => "deposit",
            Resource::Exchange => "exchange",
            Resource::Metadata => "metadata",
            Resource::Minting => "minting",
            Resource::Nft => "nft",
            Resource::Order => "order",
            Resource::Passport => "passport",
            Resource::PrimarySales => "primarySales",
            Resource::Project => "project",
            Resource::Staking => "staking",
            Resource::Trade => "trade",
            Resource::Utility => "utility",
            Resource::Wallet => "wallet",
            Resource::Withdrawal => "withdrawal",
            Resource::Zkevm => "zkevm",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown resource '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Source of a query-string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryValue {
    /// The `limit` parameter (default 50).
    Limit,
    /// A required string parameter.
    Param(&'static str),
    Fixed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    None,
    /// `{assets: [{metadata: nftMetadata, owner_address: ownerAddress}]}`
    MintOne,
    /// `{assets: nftsToMint}`
    MintBatch,
}

/// Positional parameter shape of a JSON-RPC call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcParams {
    None,
    /// `[transactionHash]`
    TxHash,
    /// `[block_tag(blockNumber), false]`
    BlockByNumber,
    /// `[{to: contractAddress, data: callData}, "latest"]`
    ContractCall,
}

/// How a JSON-RPC `result` becomes an output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcShape {
    /// Object result as-is; `null` becomes `{}`.
    Object,
    /// `{result: <value>}`
    Wrapped,
    /// `{gasPriceWei, gasPriceGwei}`
    GasPrice,
    /// `{blockNumber: <u64>}`
    BlockNumber,
}

/// Operations answered without any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalOp {
    ValidateAddress,
    WeiToEth,
    EthToWei,
    StakingInfo,
}

/// The single outbound call an operation resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Rest {
        method: HttpMethod,
        path: &'static str,
        query: &'static [(&'static str, QueryValue)],
        body: BodyShape,
    },
    Rpc {
        method: &'static str,
        params: RpcParams,
        shape: RpcShape,
    },
    /// `eth_getBalance` on zkEVM, `/v2/balances/{address}` on Immutable X.
    Balance,
    /// Active listings query reduced to a floor price.
    CollectionStats,
    /// One RPC batch on zkEVM, profile data only on Immutable X.
    NetworkStatus,
    Local(LocalOp),
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub resource: Resource,
    pub operation: &'static str,
    pub call: Call,
}

impl OperationSpec {
    /// Names of the parameters this operation reads.
    pub fn parameters(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        match self.call {
            Call::Rest { path, query, body, .. } => {
                names.extend(placeholders(path).filter(|p| *p != CHAIN_PLACEHOLDER));
                for (_, value) in query {
                    match *value {
                        QueryValue::Limit => names.push("limit"),
                        QueryValue::Param(name) => names.push(name),
                        QueryValue::Fixed(_) => {}
                    }
                }
                match body {
                    BodyShape::None => {}
                    BodyShape::MintOne => names.extend(["nftMetadata", "ownerAddress"]),
                    BodyShape::MintBatch => names.push("nftsToMint"),
                }
            }
            Call::Rpc { params, .. } => match params {
                RpcParams::None => {}
                RpcParams::TxHash => names.push("transactionHash"),
                RpcParams::BlockByNumber => names.push("blockNumber"),
                RpcParams::ContractCall => names.extend(["contractAddress", "callData"]),
            },
            Call::Balance => names.push("address"),
            Call::CollectionStats => names.push("collectionAddress"),
            Call::NetworkStatus => {}
            Call::Local(op) => match op {
                LocalOp::ValidateAddress => names.push("address"),
                LocalOp::WeiToEth | LocalOp::EthToWei => names.push("value"),
                LocalOp::StakingInfo => {}
            },
        }
        names.dedup();
        names
    }

    pub fn requires_rpc(&self) -> bool {
        matches!(self.call, Call::Rpc { .. })
    }
}

/// Path placeholder filled from the network profile's chain name.
pub const CHAIN_PLACEHOLDER: &str = "chain";

/// Placeholder names (without braces) of a path template, in order.
pub fn placeholders(template: &'static str) -> impl Iterator<Item = &'static str> {
    template
        .split('/')
        .filter_map(|seg| seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
}

/// Resolve a path template into decoded segments.
pub fn path_segments(
    template: &str,
    chain_name: &str,
    params: &Params,
) -> ConnectorResult<Vec<String>> {
    template
        .split('/')
        .filter(|seg| !seg.is_empty())
        .map(|seg| match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(CHAIN_PLACEHOLDER) => Ok(chain_name.to_string()),
            Some(name) => params.str(name),
            None => Ok(seg.to_string()),
        })
        .collect()
}

/// Find the row for a (resource, operation) pair.
pub fn lookup(resource: Resource, operation: &str) -> Option<&'static OperationSpec> {
    OPERATIONS
        .iter()
        .find(|spec| spec.resource == resource && spec.operation == operation)
}

/// String-keyed lookup used at the configuration boundary.
pub fn resolve(resource: &str, operation: &str) -> ConnectorResult<&'static OperationSpec> {
    let unsupported = || ConnectorError::UnsupportedOperation {
        resource: resource.to_string(),
        operation: operation.to_string(),
    };
    let parsed: Resource = resource.parse().map_err(|_| unsupported())?;
    lookup(parsed, operation).ok_or_else(unsupported)
}

pub fn operations() -> &'static [OperationSpec] {
    OPERATIONS
}

const PAGED: &[(&str, QueryValue)] = &[("page_size", QueryValue::Limit)];
const NO_QUERY: &[(&str, QueryValue)] = &[];

const fn get(resource: Resource, operation: &'static str, path: &'static str) -> OperationSpec {
    rest(resource, operation, HttpMethod::Get, path, NO_QUERY, BodyShape::None)
}

const fn list(resource: Resource, operation: &'static str, path: &'static str) -> OperationSpec {
    rest(resource, operation, HttpMethod::Get, path, PAGED, BodyShape::None)
}

const fn rest(
    resource: Resource,
    operation: &'static str,
    method: HttpMethod,
    path: &'static str,
    query: &'static [(&'static str, QueryValue)],
    body: BodyShape,
) -> OperationSpec {
    OperationSpec {
        resource,
        operation,
        call: Call::Rest {
            method,
            path,
            query,
            body,
        },
    }
}

const fn rpc(
    operation: &'static str,
    method: &'static str,
    params: RpcParams,
    shape: RpcShape,
) -> OperationSpec {
    OperationSpec {
        resource: Resource::Zkevm,
        operation,
        call: Call::Rpc {
            method,
            params,
            shape,
        },
    }
}

const fn special(resource: Resource, operation: &'static str, call: Call) -> OperationSpec {
    OperationSpec {
        resource,
        operation,
        call,
    }
}

use Resource as R;

static OPERATIONS: &[OperationSpec] = &[
    // Wallet
    special(R::Wallet, "getBalance", Call::Balance),
    get(R::Wallet, "getTokenBalances", "/v1/chains/{chain}/accounts/{address}/balances"),
    rest(
        R::Wallet,
        "getTransactionHistory",
        HttpMethod::Get,
        "/v1/chains/{chain}/activities",
        &[
            ("account_address", QueryValue::Param("address")),
            ("page_size", QueryValue::Fixed("50")),
        ],
        BodyShape::None,
    ),
    special(R::Wallet, "validateAddress", Call::Local(LocalOp::ValidateAddress)),
    // NFT
    get(R::Nft, "getNft", "/v1/chains/{chain}/collections/{collectionAddress}/nfts/{tokenId}"),
    list(R::Nft, "getNftsByCollection", "/v1/chains/{chain}/collections/{collectionAddress}/nfts"),
    list(R::Nft, "getNftsByOwner", "/v1/chains/{chain}/accounts/{address}/nfts"),
    // Collection
    get(R::Collection, "getCollection", "/v1/chains/{chain}/collections/{collectionAddress}"),
    list(R::Collection, "listCollections", "/v1/chains/{chain}/collections"),
    special(R::Collection, "getCollectionStats", Call::CollectionStats),
    // Minting
    rest(
        R::Minting,
        "mintNft",
        HttpMethod::Post,
        "/v1/chains/{chain}/collections/{collectionAddress}/nfts/mint-requests",
        NO_QUERY,
        BodyShape::MintOne,
    ),
    rest(
        R::Minting,
        "batchMint",
        HttpMethod::Post,
        "/v1/chains/{chain}/collections/{collectionAddress}/nfts/mint-requests",
        NO_QUERY,
        BodyShape::MintBatch,
    ),
    get(
        R::Minting,
        "getMintStatus",
        "/v1/chains/{chain}/collections/{collectionAddress}/nfts/mint-requests/{mintRequestId}",
    ),
    // Order
    get(R::Order, "getOrder", "/v1/chains/{chain}/orders/{orderId}"),
    list(R::Order, "listOrders", "/v1/chains/{chain}/orders"),
    list(R::Order, "listListings", "/v1/chains/{chain}/orders/listings"),
    list(R::Order, "listBids", "/v1/chains/{chain}/orders/bids"),
    // Trade
    get(R::Trade, "getTrade", "/v1/chains/{chain}/trades/{tradeId}"),
    list(R::Trade, "listTrades", "/v1/chains/{chain}/trades"),
    // Bridge
    get(R::Deposit, "getDeposit", "/v1/deposits/{depositId}"),
    list(R::Deposit, "listDeposits", "/v1/deposits"),
    get(R::Withdrawal, "getWithdrawal", "/v1/withdrawals/{withdrawalId}"),
    list(R::Withdrawal, "listWithdrawals", "/v1/withdrawals"),
    list(R::Exchange, "listExchanges", "/v1/exchanges"),
    // Passport
    get(R::Passport, "getUser", "/v1/users/{address}"),
    // zkEVM
    rpc("getGasPrice", "eth_gasPrice", RpcParams::None, RpcShape::GasPrice),
    rpc("getBlockNumber", "eth_blockNumber", RpcParams::None, RpcShape::BlockNumber),
    rpc("getBlock", "eth_getBlockByNumber", RpcParams::BlockByNumber, RpcShape::Object),
    rpc("getTransaction", "eth_getTransactionByHash", RpcParams::TxHash, RpcShape::Object),
    rpc(
        "getTransactionReceipt",
        "eth_getTransactionReceipt",
        RpcParams::TxHash,
        RpcShape::Object,
    ),
    rpc("callContract", "eth_call", RpcParams::ContractCall, RpcShape::Wrapped),
    // Staking
    special(R::Staking, "getStakingInfo", Call::Local(LocalOp::StakingInfo)),
    // Primary sales
    get(R::PrimarySales, "getSale", "/v1/chains/{chain}/primary-sales/{saleId}"),
    list(R::PrimarySales, "listSales", "/v1/chains/{chain}/primary-sales"),
    // Metadata
    get(
        R::Metadata,
        "getMetadataSchema",
        "/v1/chains/{chain}/collections/{collectionAddress}/metadata-schema",
    ),
    rest(
        R::Metadata,
        "refreshMetadata",
        HttpMethod::Post,
        "/v1/chains/{chain}/collections/{collectionAddress}/nfts/{tokenId}/metadata/refresh",
        NO_QUERY,
        BodyShape::None,
    ),
    // Project
    get(R::Project, "getProject", "/v1/projects/{projectId}"),
    list(R::Project, "listProjects", "/v1/projects"),
    // Crafting
    get(R::Crafting, "getRecipe", "/v1/crafting/recipes/{recipeId}"),
    list(R::Crafting, "listRecipes", "/v1/crafting/recipes"),
    // Activity
    list(R::Activity, "getActivityFeed", "/v1/chains/{chain}/activities"),
    rest(
        R::Activity,
        "getUserActivity",
        HttpMethod::Get,
        "/v1/chains/{chain}/activities",
        &[
            ("account_address", QueryValue::Param("address")),
            ("page_size", QueryValue::Limit),
        ],
        BodyShape::None,
    ),
    list(
        R::Activity,
        "getCollectionActivity",
        "/v1/chains/{chain}/collections/{collectionAddress}/activities",
    ),
    // Utility
    special(R::Utility, "weiToEth", Call::Local(LocalOp::WeiToEth)),
    special(R::Utility, "ethToWei", Call::Local(LocalOp::EthToWei)),
    special(R::Utility, "validateAddress", Call::Local(LocalOp::ValidateAddress)),
    special(R::Utility, "getNetworkStatus", Call::NetworkStatus),
];
