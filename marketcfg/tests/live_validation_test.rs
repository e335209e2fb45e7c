//! Live validation against a mocked JSON-RPC node.
//!
//! The node answers `eth_call`s to the reader with a `getMarkets` result and
//! calls to Multicall3 with an `aggregate3` result.

use alloy::primitives::{address, hex, Address, U256};
use alloy::sol_types::SolValue;
use marketcfg::directory::encode_markets;
use marketcfg::factor::{decimal_to_float, float_precision};
use marketcfg::multicall::IMulticall3;
use marketcfg::*;
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const DATA_STORE: Address = address!("4444444444444444444444444444444444444444");
const READER: Address = address!("5555555555555555555555555555555555555555");
const MULTICALL: Address = address!("6666666666666666666666666666666666666666");
const MARKET_TOKEN: Address = address!("7777777777777777777777777777777777777777");

/// Matches `eth_call` requests whose `to` is `target`.
fn eth_call_to(target: Address) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
    move |req: &Request| {
        let Ok(body) = serde_json::from_slice::<Value>(&req.body) else {
            return false;
        };
        body["method"] == "eth_call"
            && body["params"][0]["to"]
                .as_str()
                .is_some_and(|to| to.eq_ignore_ascii_case(&target.to_string()))
    }
}

fn rpc_result(data: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": hex::encode_prefixed(data)
    }))
}

fn aggregate3_result(values: &[(bool, U256)]) -> Vec<u8> {
    let results: Vec<IMulticall3::Call3Result> = values
        .iter()
        .map(|(success, value)| IMulticall3::Call3Result {
            success: *success,
            returnData: value.abi_encode().into(),
        })
        .collect();
    results.abi_encode()
}

/// The arbitrum BTC/WBTC.e/USDC market, deployed at `MARKET_TOKEN`.
fn btc_market() -> DeployedMarket {
    let tokens = marketcfg::tokens::builtin(Network::Arbitrum);
    DeployedMarket {
        market_token: MARKET_TOKEN,
        index_token: tokens.address_of("BTC").unwrap(),
        long_token: tokens.address_of("WBTC.e").unwrap(),
        short_token: tokens.address_of("USDC").unwrap(),
    }
}

/// On-chain parameters in read order: position impact, then swap impact,
/// reserve, borrowing and funding.
fn btc_params(negative_position_impact: U256) -> Vec<(bool, U256)> {
    let one = float_precision();
    let two = one * U256::from(2u64);
    let reserve = decimal_to_float(8, 1);
    let borrowing = decimal_to_float(625, 11);
    [
        negative_position_impact,
        decimal_to_float(12, 11),
        two,
        decimal_to_float(2, 10),
        decimal_to_float(2, 10),
        two,
        reserve,
        reserve,
        borrowing,
        one,
        borrowing,
        one,
        decimal_to_float(2, 8),
        one,
    ]
    .into_iter()
    .map(|v| (true, v))
    .collect()
}

/// Node serving `markets` and answering every batch with `params`.
///
/// Verifies on drop that exactly `batches` `aggregate3` calls were made.
async fn mock_node(
    markets: &[DeployedMarket],
    params: &[(bool, U256)],
    batches: u64,
) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(eth_call_to(READER))
        .respond_with(rpc_result(&encode_markets(markets)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(eth_call_to(MULTICALL))
        .respond_with(rpc_result(&aggregate3_result(params)))
        .expect(batches)
        .mount(&server)
        .await;
    server
}

fn live_options(server: &MockServer) -> RunOptions {
    RunOptions {
        source: ParamSource::Live,
        chain: Some(ChainConfig {
            rpc_url: Url::parse(&server.uri()).unwrap(),
            data_store: DATA_STORE,
            reader: READER,
            multicall: MULTICALL,
        }),
        ..RunOptions::new(Network::Arbitrum)
    }
}

#[tokio::test]
async fn test_live_market_passes() {
    let server = mock_node(&[btc_market()], &btc_params(decimal_to_float(12, 11)), 1).await;

    let report = run(&live_options(&server)).await.unwrap();

    assert_eq!(report.source, ParamSource::Live);
    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.markets.len(), 1);
    let market = &report.markets[0];
    assert_eq!(market.market_token, Some(MARKET_TOKEN.to_string()));
    assert_eq!(market.index_token.as_deref(), Some("BTC"));
    assert_eq!(market.long_token, "WBTC.e");
    assert_eq!(market.short_token, "USDC");
    assert_eq!(market.diagnostics.len(), 11);
}

#[tokio::test]
async fn test_live_market_under_floor_reported() {
    // ratio 1 still holds; floor is 2.5e-11
    let low = decimal_to_float(1, 11);
    let mut params = btc_params(low);
    params[1] = (true, low);
    let server = mock_node(&[btc_market()], &params, 1).await;

    let report = run(&live_options(&server)).await.unwrap();

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].message, "Invalid negativePositionImpactFactor for BTC");
    assert_eq!(report.errors[0].actual, low);
}

#[tokio::test]
async fn test_live_ratio_mismatch_aborts() {
    let server = mock_node(&[btc_market()], &btc_params(decimal_to_float(24, 11)), 1).await;

    let err = run(&live_options(&server)).await.unwrap_err();

    assert!(
        matches!(
            err,
            MarketCfgError::ImpactRatioMismatch { kind: "position", ref symbol, .. }
                if symbol == "BTC"
        ),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_live_failed_read_aborts() {
    let mut params = btc_params(decimal_to_float(12, 11));
    params[12] = (false, U256::ZERO);
    let server = mock_node(&[btc_market()], &params, 1).await;

    let err = run(&live_options(&server)).await.unwrap_err();

    assert!(
        matches!(err, MarketCfgError::MulticallFailed { ref label } if label == "fundingFactor"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_live_unknown_token_address_aborts() {
    let mut market = btc_market();
    market.long_token = Address::repeat_byte(0x99);
    let server = mock_node(&[market], &btc_params(decimal_to_float(12, 11)), 0).await;

    let err = run(&live_options(&server)).await.unwrap_err();

    assert!(
        matches!(err, MarketCfgError::UnknownTokenAddress(a) if a == Address::repeat_byte(0x99)),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_live_swap_only_market() {
    let tokens = marketcfg::tokens::builtin(Network::Arbitrum);
    let market = DeployedMarket {
        market_token: MARKET_TOKEN,
        index_token: Address::ZERO,
        long_token: tokens.address_of("WETH").unwrap(),
        short_token: tokens.address_of("USDC").unwrap(),
    };
    // swap reads only; a position read in the batch would fail the length check
    let params = btc_params(decimal_to_float(12, 11)).split_off(3);
    assert_eq!(params.len(), 11);
    let server = mock_node(&[market], &params, 1).await;

    let report = run(&live_options(&server)).await.unwrap();

    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.markets.len(), 1);
    let market = &report.markets[0];
    assert_eq!(market.index_token, None);
    assert_eq!(market.long_token, "WETH");
    // swap recommendation, three bps levels, three annualized rates
    assert_eq!(market.diagnostics.len(), 7);
    assert!(market
        .diagnostics
        .iter()
        .all(|d| !matches!(d, Diagnostic::TradeSizes { kind: ImpactKind::Position, .. })));
}

#[tokio::test]
async fn test_rpc_error_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "execution reverted" }
        })))
        .mount(&server)
        .await;

    let rpc = RpcClient::new(Url::parse(&server.uri()).unwrap());
    let err = rpc.eth_call(READER, &[0x01]).await.unwrap_err();

    assert!(
        matches!(
            err,
            MarketCfgError::Rpc { code: -32000, ref message } if message == "execution reverted"
        ),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_rpc_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let rpc = RpcClient::new(Url::parse(&server.uri()).unwrap());
    let err = rpc.eth_call(READER, &[0x01]).await.unwrap_err();

    assert!(
        matches!(
            err,
            MarketCfgError::Http { status: 503, ref message } if message == "unavailable"
        ),
        "unexpected error: {err}"
    );
}
