use crate::agent::{AgentState, Quote};
use crate::asset::{AssetPair, Currency, Party};
use rust_decimal::Decimal;

/// Mutable negotiation state owned outside the timing core.
///
/// The reactor reads the current state through `assets`/`agent` and applies
/// its decisions through the mutators; how the mutations are rendered is the
/// surface's business.
pub trait NegotiationStore {
    fn assets(&self) -> &AssetPair;
    fn agent(&self) -> &AgentState;

    fn set_amount(&mut self, party: Party, amount: Option<Decimal>);
    fn set_asset(&mut self, party: Party, currency: Currency);
    /// Select the given market and align the pair's currencies with it.
    fn set_market(&mut self, from: &Currency, to: &Currency);
    fn set_quote(&mut self, quote: Quote);
    fn clear_quote(&mut self);
    fn change_rate(&mut self, rate: Decimal);
    fn set_quote_locked(&mut self, locked: bool);
}

/// Reference implementation backing the sim binary and the tests.
#[derive(Clone, Debug)]
pub struct InMemoryStore {
    assets: AssetPair,
    agent: AgentState,
}

impl InMemoryStore {
    pub fn new(assets: AssetPair, agent: AgentState) -> Self {
        Self { assets, agent }
    }
}

impl NegotiationStore for InMemoryStore {
    fn assets(&self) -> &AssetPair {
        &self.assets
    }

    fn agent(&self) -> &AgentState {
        &self.agent
    }

    fn set_amount(&mut self, party: Party, amount: Option<Decimal>) {
        self.assets.asset_mut(party).amount = amount;
    }

    fn set_asset(&mut self, party: Party, currency: Currency) {
        self.assets.asset_mut(party).currency = currency;
    }

    fn set_market(&mut self, from: &Currency, to: &Currency) {
        let market = self
            .agent
            .markets
            .iter()
            .find(|market| &market.from == from && &market.to == to)
            .cloned();

        if let Some(market) = market {
            self.assets.a.currency = market.from.clone();
            self.assets.b.currency = market.to.clone();
            self.agent.market = Some(market);
        }
    }

    fn set_quote(&mut self, quote: Quote) {
        self.assets.rate = Some(quote.rate);
        self.agent.quote = Some(quote);
    }

    fn clear_quote(&mut self) {
        self.agent.quote = None;
    }

    fn change_rate(&mut self, rate: Decimal) {
        self.assets.rate = Some(rate);
    }

    fn set_quote_locked(&mut self, locked: bool) {
        self.agent.quote_locked = locked;
    }
}
