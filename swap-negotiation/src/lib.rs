pub mod agent;
pub mod asset;
pub mod coordinator;
pub mod countdown;
pub mod env;
pub mod event_loop;
pub mod expiration;
pub mod market;
pub mod reactor;
pub mod store;
pub mod trace;

pub use agent::{AgentState, Quote};
pub use asset::{Asset, AssetPair, Currency, Party};
pub use coordinator::{QuoteRefreshCoordinator, RequestQuote, RequestValidator};
pub use event_loop::{EventLoop, EventLoopHandle};
pub use expiration::{Expiration, ExpirationFeed};
pub use market::{Limits, Market, NoCompatibleMarket};
pub use reactor::NegotiationReactor;
pub use store::{InMemoryStore, NegotiationStore};
