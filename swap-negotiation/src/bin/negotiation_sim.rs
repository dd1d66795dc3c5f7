use anyhow::Result;
use rust_decimal::Decimal;
use swap_negotiation::env::{GetConfig, Testnet};
use swap_negotiation::expiration;
use swap_negotiation::trace::init_tracing;
use swap_negotiation::{
    AgentState, Asset, AssetPair, EventLoop, InMemoryStore, Limits, Market, Party, Quote,
};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout, Duration};
use tracing_subscriber::filter::LevelFilter;

/// Drives the negotiation event loop against a scripted pricing agent.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(LevelFilter::DEBUG)?;

    let config = Testnet::get_config();
    config.validate()?;

    let markets = vec![
        Market {
            from: "BTC".into(),
            to: "ETH".into(),
            rate: Some("15.2".parse()?),
            limits: Some(Limits {
                min: "0.01".parse()?,
                max: "2".parse()?,
            }),
        },
        Market {
            from: "BTC".into(),
            to: "LTC".into(),
            rate: Some("205".parse()?),
            limits: None,
        },
    ];
    let agent = AgentState {
        market: Some(markets[0].clone()),
        markets,
        quote: None,
        quote_locked: false,
    };
    let store = InMemoryStore::new(
        AssetPair::new(Asset::empty("BTC"), Asset::empty("ETH")),
        agent,
    );

    let (quote_requests, mut incoming) = mpsc::unbounded_channel();
    let requester = move || {
        let _ = quote_requests.send(());
    };
    let validator = |assets: &AssetPair, agent: &AgentState| {
        let amount = match assets.a.amount {
            Some(amount) if amount > Decimal::ZERO => amount,
            _ => return false,
        };
        match agent.market.as_ref().and_then(|market| market.limits) {
            Some(limits) => amount >= limits.min && amount <= limits.max,
            None => true,
        }
    };

    let (event_loop, handle) = EventLoop::new(store, validator, requester);
    let negotiation = tokio::spawn(event_loop.run());

    let (expirations, _expiration_guard) = expiration::refresh(config);
    let deadlines = expirations.latest();
    tracing::info!(
        refund_at = %deadlines.refund_at,
        escrow_timeout_at = %deadlines.escrow_timeout_at,
        "Escrow deadlines"
    );

    // A user typing an amount in three quick edits; the debounce collapses
    // them into one quote request.
    for amount in ["0.3", "0.35", "0.5"] {
        handle.amount_changed(Party::A, Some(amount.parse()?))?;
        sleep(Duration::from_millis(200)).await;
    }

    let mut rate: Decimal = "15.2".parse()?;
    while let Ok(Some(())) = timeout(Duration::from_secs(2), incoming.recv()).await {
        rate += "0.01".parse::<Decimal>()?;
        let quote = Quote::new(rate);
        tracing::info!(id = %quote.id, %rate, "Answering quote request");
        handle.quote_received(quote)?;
    }

    handle.select_asset(Party::B, "LTC".into()).await?;
    if let Ok(Some(())) = timeout(Duration::from_secs(2), incoming.recv()).await {
        handle.quote_received(Quote::new("205.4".parse()?))?;
    }

    handle.quote_lock_changed(true)?;
    sleep(Duration::from_secs(1)).await;
    handle.quote_lock_changed(false)?;
    if let Ok(Some(())) = timeout(Duration::from_secs(2), incoming.recv()).await {
        handle.quote_received(Quote::new(rate))?;
    }

    let deadlines = expirations.latest();
    tracing::info!(
        refund_at = %deadlines.refund_at,
        escrow_timeout_at = %deadlines.escrow_timeout_at,
        "Escrow deadlines before teardown"
    );

    drop(handle);
    negotiation.await?;
    tracing::info!("Negotiation surface shut down");

    Ok(())
}
