use crate::market::Market;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A priced offer from the agent. The timing core only cares about its
/// presence and the lock flag on [`AgentState`]; the rate is carried through
/// for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub rate: Decimal,
}

impl Quote {
    pub fn new(rate: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            rate,
        }
    }
}

/// The pricing agent's current offer as seen by the negotiation surface.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Markets the agent trades, in offer order.
    pub markets: Vec<Market>,
    /// The market currently selected for the negotiation, if any.
    pub market: Option<Market>,
    pub quote: Option<Quote>,
    pub quote_locked: bool,
}

impl AgentState {
    pub fn has_markets(&self) -> bool {
        !self.markets.is_empty()
    }
}
