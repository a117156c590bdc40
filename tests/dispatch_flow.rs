//! Dispatch against a mocked Immutable API and JSON-RPC node.

mod common;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{dispatcher_for, API_KEY, RPC_PATH};
use immutable_connector::dispatch::{run_batch, ItemOutput, OperationRequest, Params};
use immutable_connector::{ConnectorError, NetworkId};

fn request(resource: &str, operation: &str, params: Params) -> OperationRequest {
    OperationRequest::new(resource, operation, params)
}

#[tokio::test]
async fn test_rest_get_fills_chain_and_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/chains/imtbl-zkevm-testnet/collections/0xabc/nfts/7"))
        .and(header("x-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"token_id": "7", "name": "Sword"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmTestnet, Some(API_KEY));
    let record = dispatcher
        .dispatch(&request(
            "nft",
            "getNft",
            Params::new().with("collectionAddress", "0xabc").with("tokenId", "7"),
        ))
        .await
        .unwrap();

    assert_eq!(record["result"]["name"], "Sword");
}

#[tokio::test]
async fn test_list_uses_limit_as_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/chains/imx-mainnet/accounts/0xowner/nfts"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/chains/imx-mainnet/trades"))
        .and(query_param("page_size", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ImxMainnet, None);
    dispatcher
        .dispatch(&request(
            "nft",
            "getNftsByOwner",
            Params::new().with("address", "0xowner").with("limit", 10),
        ))
        .await
        .unwrap();
    dispatcher
        .dispatch(&request("trade", "listTrades", Params::new()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_transaction_history_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/chains/imtbl-zkevm-testnet/activities"))
        .and(query_param("account_address", "0xuser"))
        .and(query_param("page_size", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": [{"id": "a1"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmTestnet, None);
    let record = dispatcher
        .dispatch(&request(
            "wallet",
            "getTransactionHistory",
            Params::new().with("address", "0xuser").with("limit", 5),
        ))
        .await
        .unwrap();
    assert_eq!(record["result"][0]["id"], "a1");
}

#[tokio::test]
async fn test_mint_posts_assets_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chains/imtbl-zkevm-testnet/collections/0xc0/nfts/mint-requests"))
        .and(body_json(json!({
            "assets": [{"metadata": {"name": "Shield"}, "owner_address": "0xowner"}]
        })))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"imx_mint_requests_limit": "1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmTestnet, Some(API_KEY));
    let record = dispatcher
        .dispatch(&request(
            "minting",
            "mintNft",
            Params::new()
                .with("collectionAddress", "0xc0")
                .with("nftMetadata", r#"{"name": "Shield"}"#)
                .with("ownerAddress", "0xowner"),
        ))
        .await
        .unwrap();
    assert_eq!(record["imx_mint_requests_limit"], "1");
}

#[tokio::test]
async fn test_malformed_mint_json_makes_no_call() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmTestnet, None);

    let err = dispatcher
        .dispatch(&request(
            "minting",
            "batchMint",
            Params::new()
                .with("collectionAddress", "0xc0")
                .with("nftsToMint", "[{broken"),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rpc_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_getBlockByNumber",
            "params": ["0xff", false]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"number": "0xff", "hash": "0x01"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmTestnet, None);
    let record = dispatcher
        .dispatch(&request("zkevm", "getBlock", Params::new().with("blockNumber", "255")))
        .await
        .unwrap();
    assert_eq!(record["number"], "0xff");
}

#[tokio::test]
async fn test_gas_price_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 1, "result": "0x2540be400"
        })))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmMainnet, None);
    let record = dispatcher
        .dispatch(&request("zkevm", "getGasPrice", Params::new()))
        .await
        .unwrap();
    assert_eq!(record["gasPriceWei"], "10000000000");
    assert_eq!(record["gasPriceGwei"], "10.000000000");
}

#[tokio::test]
async fn test_rpc_error_member_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "execution reverted"}
        })))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmTestnet, None);
    let err = dispatcher
        .dispatch(&request(
            "zkevm",
            "callContract",
            Params::new()
                .with("contractAddress", "0xc0ffee")
                .with("callData", "0x70a08231"),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::Upstream { status: None, .. }));
    assert_eq!(err.to_string(), "RPC Error: execution reverted");
}

#[tokio::test]
async fn test_http_error_status_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/chains/imtbl-zkevm-testnet/orders/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("order not found"))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmTestnet, None);
    let err = dispatcher
        .dispatch(&request("order", "getOrder", Params::new().with("orderId", "missing")))
        .await
        .unwrap_err();

    match err {
        ConnectorError::Upstream { status, message } => {
            assert_eq!(status, Some(404));
            assert_eq!(message, "order not found");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_rest_only_network_rejects_rpc_without_calling() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher_for(&server, NetworkId::ImxTestnet, None);

    let err = dispatcher
        .dispatch(&request("zkevm", "getBlockNumber", Params::new()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ConnectorError::RpcUnavailable { network: NetworkId::ImxTestnet }
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_balance_per_network_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/balances/0xabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"symbol": "IMX", "balance": "5"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_json(json!({
            "jsonrpc": "2.0", "id": 1, "method": "eth_getBalance", "params": ["0xabc", "latest"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 1, "result": "0x3635c9adc5dea00000"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = Params::new().with("address", "0xabc");

    let imx = dispatcher_for(&server, NetworkId::ImxMainnet, None);
    let record = imx
        .dispatch(&request("wallet", "getBalance", params.clone()))
        .await
        .unwrap();
    assert_eq!(record["result"][0]["symbol"], "IMX");

    let zkevm = dispatcher_for(&server, NetworkId::ZkevmMainnet, None);
    let record = zkevm
        .dispatch(&request("wallet", "getBalance", params))
        .await
        .unwrap();
    assert_eq!(record["address"], "0xabc");
    assert_eq!(record["balanceWei"], "1000000000000000000000");
    assert_eq!(record["balanceEth"], "1000.000000000000000000");
}

#[tokio::test]
async fn test_collection_stats_floor_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/chains/imtbl-zkevm-testnet/orders/listings"))
        .and(query_param("sell_item_contract_address", "0xcol"))
        .and(query_param("status", "ACTIVE"))
        .and(query_param("page_size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"buy": [{"amount": "500"}]},
                {"buy": [{"amount": "0"}]},
                {"buy": [{"amount": "300"}]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmTestnet, None);
    let record = dispatcher
        .dispatch(&request(
            "collection",
            "getCollectionStats",
            Params::new().with("collectionAddress", "0xcol"),
        ))
        .await
        .unwrap();

    assert_eq!(record["collectionAddress"], "0xcol");
    assert_eq!(record["floorPriceWei"], "300");
    assert_eq!(record["totalListings"], 2);
}

#[tokio::test]
async fn test_network_status_is_one_batch_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_json(json!([
            {"jsonrpc": "2.0", "id": 1, "method": "eth_blockNumber", "params": []},
            {"jsonrpc": "2.0", "id": 2, "method": "eth_gasPrice", "params": []}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"jsonrpc": "2.0", "id": 2, "result": "0x3b9aca00"},
            {"jsonrpc": "2.0", "id": 1, "result": "0x10"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmTestnet, None);
    let record = dispatcher
        .dispatch(&request("utility", "getNetworkStatus", Params::new()))
        .await
        .unwrap();

    assert_eq!(record["network"], "imtbl-zkevm-testnet");
    assert_eq!(record["chainId"], 13473);
    assert_eq!(record["blockNumber"], 16);
    assert_eq!(record["gasPriceWei"], "1000000000");
}

#[tokio::test]
async fn test_no_api_key_header_when_unset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .and(header_exists("x-api-key"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ImxMainnet, Some(""));
    dispatcher
        .dispatch(&request("project", "listProjects", Params::new()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_check_credentials_hits_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .and(header("x-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, NetworkId::ZkevmMainnet, Some(API_KEY));
    let health: Value = dispatcher.client().check_credentials().await.unwrap();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn test_batch_policy_with_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/deposits/good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "good"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/deposits/bad"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let items: Vec<_> = ["good", "bad", "good"]
        .iter()
        .map(|id| request("deposit", "getDeposit", Params::new().with("depositId", *id)))
        .collect();
    let dispatcher = dispatcher_for(&server, NetworkId::ImxMainnet, None);

    let outputs = run_batch(&dispatcher, &items, true).await.unwrap();
    assert_eq!(outputs.len(), 3);
    assert!(matches!(&outputs[0], ItemOutput::Success(r) if r["id"] == "good"));
    match &outputs[1] {
        ItemOutput::Failed { error } => assert!(error.contains("500")),
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(&outputs[2], ItemOutput::Success(_)));

    let err = run_batch(&dispatcher, &items, false).await.unwrap_err();
    assert_eq!(err.index, 1);
}
