use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use swap_negotiation::{
    AgentState, Asset, AssetPair, EventLoop, EventLoopHandle, InMemoryStore, Limits, Market,
    NegotiationStore, Party,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

fn market(from: &str, to: &str) -> Market {
    Market {
        from: from.into(),
        to: to.into(),
        rate: Some(dec!(15.2)),
        limits: Some(Limits {
            min: dec!(0.001),
            max: dec!(10),
        }),
    }
}

fn spawn_surface() -> (
    EventLoopHandle,
    mpsc::UnboundedReceiver<()>,
    Arc<AtomicBool>,
    JoinHandle<InMemoryStore>,
) {
    let markets = vec![market("BTC", "ETH"), market("BTC", "LTC")];
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

    let valid = Arc::new(AtomicBool::new(true));
    let validator = {
        let valid = valid.clone();
        move |_: &AssetPair, _: &AgentState| valid.load(Ordering::SeqCst)
    };

    let (requests, incoming) = mpsc::unbounded_channel();
    let requester = move || {
        let _ = requests.send(());
    };

    let (event_loop, handle) = EventLoop::new(store, validator, requester);
    let task = tokio::spawn(event_loop.run());

    (handle, incoming, valid, task)
}

#[tokio::test(start_paused = true)]
async fn burst_of_edits_collapses_into_one_refresh_then_periodic_cadence() {
    let (handle, mut requests, _valid, task) = spawn_surface();

    handle.amount_changed(Party::A, Some(dec!(0.1))).unwrap();
    handle.amount_changed(Party::A, Some(dec!(0.2))).unwrap();
    handle.amount_changed(Party::A, Some(dec!(0.3))).unwrap();

    timeout(Duration::from_secs(2), requests.recv())
        .await
        .expect("debounced refresh")
        .unwrap();

    // The countdown restarted at the full period; nothing fires inside it.
    assert!(timeout(Duration::from_secs(59), requests.recv()).await.is_err());

    timeout(Duration::from_secs(5), requests.recv())
        .await
        .expect("periodic refresh after one period")
        .unwrap();

    drop(handle);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn locking_the_quote_suspends_refresh_until_unlocked() {
    let (handle, mut requests, _valid, task) = spawn_surface();

    handle.amount_changed(Party::A, Some(dec!(0.5))).unwrap();
    timeout(Duration::from_secs(2), requests.recv())
        .await
        .expect("initial refresh")
        .unwrap();

    handle.quote_lock_changed(true).unwrap();
    assert!(timeout(Duration::from_secs(180), requests.recv()).await.is_err());

    handle.quote_lock_changed(false).unwrap();
    timeout(Duration::from_secs(2), requests.recv())
        .await
        .expect("debounced refresh after unlock")
        .unwrap();

    drop(handle);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn turning_invalid_stops_the_countdown_without_refresh() {
    let (handle, mut requests, valid, task) = spawn_surface();

    handle.amount_changed(Party::A, Some(dec!(0.5))).unwrap();
    timeout(Duration::from_secs(2), requests.recv())
        .await
        .expect("initial refresh")
        .unwrap();

    valid.store(false, Ordering::SeqCst);

    assert!(timeout(Duration::from_secs(180), requests.recv()).await.is_err());

    drop(handle);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn selecting_an_asset_refreshes_against_the_resolved_market() {
    let (handle, mut requests, _valid, task) = spawn_surface();
    handle.amount_changed(Party::A, Some(dec!(0.5))).unwrap();
    timeout(Duration::from_secs(2), requests.recv())
        .await
        .expect("initial refresh")
        .unwrap();

    handle.select_asset(Party::B, "LTC".into()).await.unwrap();

    timeout(Duration::from_secs(2), requests.recv())
        .await
        .expect("refresh for the new market")
        .unwrap();

    drop(handle);
    let store = task.await.unwrap();
    assert_eq!(
        store.agent().market.as_ref().map(|m| m.to.clone()),
        Some("LTC".into())
    );
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_pending_refresh_and_returns_the_store() {
    let (handle, mut requests, _valid, task) = spawn_surface();

    // Arm a debounced refresh, then tear down before it can fire.
    handle.amount_changed(Party::A, Some(dec!(0.7))).unwrap();
    drop(handle);

    let store = timeout(Duration::from_secs(5), task)
        .await
        .expect("loop exits once all handles are gone")
        .unwrap();

    assert_eq!(store.assets().a.amount, Some(dec!(0.7)));
    // The requester is gone with the loop; an empty channel proves the
    // pending refresh never fired.
    assert!(requests.recv().await.is_none());
}
