use crate::asset::{Currency, Party};
use crate::coordinator::{QuoteRefreshCoordinator, RequestQuote, RequestValidator};
use crate::market::{self, NoCompatibleMarket};
use crate::store::NegotiationStore;
use rust_decimal::Decimal;
use tokio::time::Instant;

/// Applies the negotiation rules whenever the owning surface reports a
/// change, and drives the refresh coordinator accordingly.
///
/// The rules only apply while the agent offers markets; without them there is
/// no quote to keep fresh.
pub struct NegotiationReactor<V, Q> {
    coordinator: QuoteRefreshCoordinator<V, Q>,
}

impl<V, Q> NegotiationReactor<V, Q>
where
    V: RequestValidator,
    Q: RequestQuote,
{
    pub fn new(coordinator: QuoteRefreshCoordinator<V, Q>) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &QuoteRefreshCoordinator<V, Q> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut QuoteRefreshCoordinator<V, Q> {
        &mut self.coordinator
    }

    /// The amount on one side changed. An amount cleared to empty is stored
    /// but does not trigger the refresh rules.
    pub fn on_amount_changed<S>(
        &mut self,
        store: &mut S,
        party: Party,
        amount: Option<Decimal>,
        now: Instant,
    ) where
        S: NegotiationStore,
    {
        let triggers = amount.is_some() && store.assets().asset(party).amount != amount;
        store.set_amount(party, amount);

        if triggers {
            self.on_asset_changed(store, now);
        }
    }

    /// An amount or currency on either side changed.
    ///
    /// Invalid state resets the working quote and stops the countdown; valid
    /// state schedules a debounced refresh.
    pub fn on_asset_changed<S>(&mut self, store: &mut S, now: Instant)
    where
        S: NegotiationStore,
    {
        if !store.agent().has_markets() {
            return;
        }

        if !self.coordinator.is_request_valid(store.assets(), store.agent()) {
            tracing::debug!(pair = %store.assets(), "Negotiation state invalid, resetting quote");
            self.reset_quote(store);
            self.coordinator.stop();
            return;
        }

        self.coordinator.request_immediate_refresh(now);
    }

    /// The agent's quote lock flipped. `locked` is the new value.
    pub fn on_quote_lock_changed<S>(&mut self, store: &S, locked: bool, now: Instant)
    where
        S: NegotiationStore,
    {
        if !store.agent().has_markets() {
            return;
        }

        if locked {
            tracing::debug!("Quote locked, suspending refresh");
            self.coordinator.stop();
        } else {
            tracing::debug!("Quote unlocked, scheduling refresh");
            self.coordinator.request_immediate_refresh(now);
        }
    }

    /// Apply a newly selected currency and resolve the market to trade on.
    ///
    /// Without agent markets the currency is applied as-is. Otherwise the
    /// resolved market is applied too; if none is compatible, nothing beyond
    /// the currency choice is applied and the caller surfaces the error.
    pub fn select_asset<S>(
        &mut self,
        store: &mut S,
        party: Party,
        currency: Currency,
        now: Instant,
    ) -> Result<(), NoCompatibleMarket>
    where
        S: NegotiationStore,
    {
        store.set_asset(party, currency.clone());

        if store.agent().has_markets() {
            let resolved =
                market::resolve(&store.agent().markets, &currency, party, store.assets())
                    .map(|market| (market.from.clone(), market.to.clone()));

            match resolved {
                Some((from, to)) => store.set_market(&from, &to),
                None => {
                    let (from, to) = market::hypothetical_pair(&currency, party, store.assets());
                    return Err(NoCompatibleMarket {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
            }
        }

        self.on_asset_changed(store, now);

        Ok(())
    }

    /// Drop the working quote and fall back to the selected market's static
    /// rate.
    fn reset_quote<S>(&mut self, store: &mut S)
    where
        S: NegotiationStore,
    {
        if store.agent().quote.is_some() {
            store.clear_quote();
        }

        if let Some(rate) = store.agent().market.as_ref().and_then(|market| market.rate) {
            store.change_rate(rate);
        }
    }
}
