use crate::asset::{AssetPair, Currency, Party};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade size bounds attached to a market.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub min: Decimal,
    pub max: Decimal,
}

/// A directed tradable pair offered by the pricing agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub from: Currency,
    pub to: Currency,
    /// Static indicative rate from the agent's offer, displayed until a live
    /// quote arrives.
    pub rate: Option<Decimal>,
    pub limits: Option<Limits>,
}

/// The agent offers no market that can serve the requested pair.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("agent offers no market compatible with {from}/{to}")]
pub struct NoCompatibleMarket {
    pub from: Currency,
    pub to: Currency,
}

/// Resolve the market to trade on after `requested` has been chosen for
/// `fixed_side`, keeping the other side's current currency.
///
/// An exact match on both sides wins. Failing that, the first market selling
/// the correct source asset is taken and the counter asset follows the
/// agent's offer. `None` means no compatible market exists and the caller
/// must not apply a selection.
pub fn resolve<'a>(
    markets: &'a [Market],
    requested: &Currency,
    fixed_side: Party,
    current: &AssetPair,
) -> Option<&'a Market> {
    let (from, to) = hypothetical_pair(requested, fixed_side, current);

    markets
        .iter()
        .find(|market| &market.from == from && &market.to == to)
        .or_else(|| markets.iter().find(|market| &market.from == from))
}

/// The full pair that would result from applying `requested` to `fixed_side`.
pub fn hypothetical_pair<'a>(
    requested: &'a Currency,
    fixed_side: Party,
    current: &'a AssetPair,
) -> (&'a Currency, &'a Currency) {
    match fixed_side {
        Party::A => (requested, &current.b.currency),
        Party::B => (&current.a.currency, requested),
    }
}

/// Trade limits the agent imposes on the given pair, if it trades it at all.
pub fn limits_for(markets: &[Market], from: &Currency, to: &Currency) -> Option<Limits> {
    markets
        .iter()
        .find(|market| &market.from == from && &market.to == to)
        .and_then(|market| market.limits)
}

/// The currencies selectable for `party` given the agent's offer: every
/// source asset for side `a`, every counter asset reachable from the current
/// side-`a` currency for side `b`. The currently selected currency is
/// excluded; offer order is preserved.
pub fn selectable_assets(markets: &[Market], party: Party, current: &AssetPair) -> Vec<Currency> {
    let selected = current.currency(party);

    let candidates = markets.iter().filter_map(|market| match party {
        Party::A => Some(&market.from),
        Party::B => (market.from == current.a.currency).then_some(&market.to),
    });

    let mut assets = Vec::new();
    for currency in candidates {
        if currency != selected && !assets.contains(currency) {
            assets.push(currency.clone());
        }
    }
    assets
}

/// Whether the agent also trades the pair in the opposite direction.
pub fn can_switch_sides(markets: &[Market], current: &AssetPair) -> bool {
    markets
        .iter()
        .any(|market| market.from == current.b.currency && market.to == current.a.currency)
}
