//! Perp Trader Simulation.
//!
//! Drives the trading session end to end against the in-memory exchange:
//! product discovery, order placement, the pending-cache merge during
//! indexer lag, cancellation, and position valuation.

use perp_trader::*;
use rust_decimal_macros::dec;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perp_trader=info".into()),
        )
        .init();

    println!("Perp Trader Simulation");
    println!("Wire Encoding, Pending Cache, Position Valuation\n");

    scenario_1_product_discovery().await;
    scenario_2_order_placement_and_indexer_lag().await;
    scenario_3_cancellation().await;
    scenario_4_positions_and_pnl().await;
    scenario_5_failed_submission().await;

    println!("\nAll simulations completed successfully.");
}

async fn connected_session() -> (Arc<SimExchange>, TraderSession) {
    let sim = Arc::new(SimExchange::new());
    let mut session = TraderSession::new(
        TraderConfig::testnet("0xfeedface"),
        sim.clone() as Arc<dyn ExchangeClient>,
    )
    .unwrap();
    session.connect().await.unwrap();
    (sim, session)
}

/// Catalog loading and the leverage estimate.
async fn scenario_1_product_discovery() {
    println!("Scenario 1: Product Discovery\n");

    let (_sim, session) = connected_session().await;
    println!("  Subaccount: {}", session.subaccount());

    for product in session.products().unwrap() {
        let leverage = product
            .max_leverage()
            .map(|l| format!("{l:.0}x"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  [{}] {} oracle ${} max leverage {}",
            product.product_id,
            product.symbol,
            product.oracle_price.unwrap_or_default(),
            leverage
        );
    }
    println!();
}

/// Orders are pending until the indexer catches up; the merged view bridges
/// the gap either way.
async fn scenario_2_order_placement_and_indexer_lag() {
    println!("Scenario 2: Order Placement and Indexer Lag\n");

    let (sim, session) = connected_session().await;

    // quote the configured offset inside the book; with an empty book the
    // suggestion falls back to the oracle price
    let config = session.config().clone();
    let product = config.default_product_id;
    let bid = session.suggest_limit_price(product, Side::Buy).await.unwrap().unwrap();
    let ask = session.suggest_limit_price(product, Side::Sell).await.unwrap().unwrap();

    let buy = session.buy_limit(product, bid, config.default_order_size).await.unwrap();
    let sell = session.sell_limit(product, ask, config.default_order_size).await.unwrap();
    println!("  Placed BUY {} @ ${} -> {}", buy.size, buy.price, buy.digest);
    println!("  Placed SELL {} @ ${} -> {}", sell.size, sell.price, sell.digest);

    let depth = session.market_depth(product, 5).await.unwrap();
    println!(
        "  Book now: best bid ${}, best ask ${}",
        depth.best_bid().unwrap_or_default(),
        depth.best_ask().unwrap_or_default()
    );

    let view = session.open_orders(None).await.unwrap();
    let pending = view.iter().filter(|r| r.pending).count();
    println!("  Before indexing: {} open orders, {} pending locally", view.len(), pending);

    sim.index_all().await;
    let view = session.open_orders(None).await.unwrap();
    let pending = view.iter().filter(|r| r.pending).count();
    println!("  After indexing: {} open orders, {} pending locally\n", view.len(), pending);
}

/// Single-order cancel and cancel-all, with pending-cache eviction counts.
async fn scenario_3_cancellation() {
    println!("Scenario 3: Cancellation\n");

    let (sim, session) = connected_session().await;

    let btc = session.buy_limit(ProductId(2), dec!(49000), dec!(1)).await.unwrap();
    session.buy_limit(ProductId(4), dec!(2900), dec!(2)).await.unwrap();
    session.sell_limit(ProductId(4), dec!(3100), dec!(2)).await.unwrap();
    sim.index_all().await;

    session.cancel_order(ProductId(2), btc.digest.clone()).await.unwrap();
    println!("  Canceled {} on BTC-PERP", btc.digest);

    let outcome = session.cancel_all(Some(ProductId(4))).await.unwrap();
    println!("  Cancel-all on ETH-PERP evicted {} pending entries", outcome.pending_evicted);

    let remaining = session.open_orders(None).await.unwrap();
    println!("  Remaining open orders: {}\n", remaining.len());
}

/// Balances become positions, valued against live oracle prices.
async fn scenario_4_positions_and_pnl() {
    println!("Scenario 4: Positions and PnL\n");

    let (sim, session) = connected_session().await;

    // long 0.5 BTC entered around $48k, short 10 SOL entered around $160
    sim.set_balance(ProductId(2), dec!(0.5), dec!(-24000)).await;
    sim.set_balance(ProductId(8), dec!(-10), dec!(1600)).await;

    for position in session.positions().await.unwrap() {
        println!(
            "  [{}] {} {} -> unrealized pnl ${}",
            position.product_id,
            position.side,
            position.size.abs(),
            position.unrealized_pnl
        );
    }

    println!("  SOL oracle drops to $140...");
    sim.set_oracle_price(ProductId(8), Some(dec!(140))).await;
    for position in session.positions().await.unwrap() {
        if position.product_id == ProductId(8) {
            println!("  [{}] short pnl now ${}", position.product_id, position.unrealized_pnl);
        }
    }
    println!();
}

/// A failed submission never reaches the pending cache.
async fn scenario_5_failed_submission() {
    println!("Scenario 5: Failed Submission\n");

    let (sim, session) = connected_session().await;

    sim.fail_next_submit().await;
    let result = session.buy_limit(ProductId(2), dec!(49000), dec!(1)).await;
    println!("  Submission failed as expected: {}", result.unwrap_err());
    println!("  Pending cache entries: {}", session.pending_orders().await.len());

    let retry = session.buy_limit(ProductId(2), dec!(49000), dec!(1)).await.unwrap();
    println!("  Manual retry accepted -> {}", retry.digest);
    println!("  Pending cache entries: {}", session.pending_orders().await.len());
}
