use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Currency symbol, e.g. `BTC` or `ETH`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Currency {
    fn from(symbol: &str) -> Self {
        Self(symbol.to_owned())
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of the pair an operation refers to. Side `a` is what the local
/// party gives, side `b` what it receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Party {
    A,
    B,
}

impl Party {
    pub fn other(self) -> Self {
        match self {
            Party::A => Party::B,
            Party::B => Party::A,
        }
    }
}

impl Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::A => write!(f, "a"),
            Party::B => write!(f, "b"),
        }
    }
}

/// One side of the swap. `amount` is `None` while the input field is empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub currency: Currency,
    pub amount: Option<Decimal>,
}

impl Asset {
    pub fn new(currency: impl Into<Currency>, amount: Decimal) -> Self {
        Self {
            currency: currency.into(),
            amount: Some(amount),
        }
    }

    pub fn empty(currency: impl Into<Currency>) -> Self {
        Self {
            currency: currency.into(),
            amount: None,
        }
    }
}

/// The pair under negotiation, together with the rate currently displayed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetPair {
    pub a: Asset,
    pub b: Asset,
    pub rate: Option<Decimal>,
}

impl AssetPair {
    pub fn new(a: Asset, b: Asset) -> Self {
        Self { a, b, rate: None }
    }

    pub fn asset(&self, party: Party) -> &Asset {
        match party {
            Party::A => &self.a,
            Party::B => &self.b,
        }
    }

    pub fn asset_mut(&mut self, party: Party) -> &mut Asset {
        match party {
            Party::A => &mut self.a,
            Party::B => &mut self.b,
        }
    }

    pub fn currency(&self, party: Party) -> &Currency {
        &self.asset(party).currency
    }
}

impl Display for AssetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.a.currency, self.b.currency)
    }
}
