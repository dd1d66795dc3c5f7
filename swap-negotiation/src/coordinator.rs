use crate::agent::AgentState;
use crate::asset::AssetPair;
use crate::countdown::{Countdown, Tick};
use crate::env::{QUOTE_DEBOUNCE, QUOTE_REFRESH_PERIOD_SECS};
use tokio::time::Instant;

/// Decides whether a quote may be requested for the current negotiation
/// state. The rule content lives outside this crate.
pub trait RequestValidator {
    fn is_request_valid(&self, assets: &AssetPair, agent: &AgentState) -> bool;
}

impl<F> RequestValidator for F
where
    F: Fn(&AssetPair, &AgentState) -> bool,
{
    fn is_request_valid(&self, assets: &AssetPair, agent: &AgentState) -> bool {
        self(assets, agent)
    }
}

/// Issues a new quote request towards the pricing agent.
///
/// Fire and forget: a failed request simply means `AgentState::quote` never
/// updates, and the countdown keeps running towards the next attempt.
pub trait RequestQuote {
    fn request_quote(&mut self);
}

impl<F> RequestQuote for F
where
    F: FnMut(),
{
    fn request_quote(&mut self) {
        self()
    }
}

/// Drives periodic and on-demand quote refresh for one negotiation surface.
///
/// Owns the only countdown of the surface and at most one pending debounced
/// refresh. All timing is injected by the driving loop, so every transition
/// here is synchronous and no cancelled timer can fire afterwards.
pub struct QuoteRefreshCoordinator<V, Q> {
    countdown: Countdown,
    pending_refresh: Option<Instant>,
    validator: V,
    requester: Q,
}

impl<V, Q> QuoteRefreshCoordinator<V, Q>
where
    V: RequestValidator,
    Q: RequestQuote,
{
    pub fn new(validator: V, requester: Q) -> Self {
        Self {
            countdown: Countdown::new(QUOTE_REFRESH_PERIOD_SECS),
            pending_refresh: None,
            validator,
            requester,
        }
    }

    pub fn is_counting(&self) -> bool {
        self.countdown.is_active()
    }

    pub fn remaining(&self) -> u64 {
        self.countdown.remaining()
    }

    pub fn is_request_valid(&self, assets: &AssetPair, agent: &AgentState) -> bool {
        self.validator.is_request_valid(assets, agent)
    }

    /// (Re)start the countdown at a full period.
    pub fn start(&mut self) {
        self.countdown.start();
        tracing::debug!(remaining = self.countdown.remaining(), "Quote countdown started");
    }

    /// Stop the countdown and reset it to a full period. No-op when idle.
    pub fn stop(&mut self) {
        if self.countdown.is_active() {
            tracing::debug!("Quote countdown stopped");
        }
        self.countdown.stop();
    }

    /// Advance the countdown by one second.
    ///
    /// The validity predicate is re-evaluated first; an invalid state stops
    /// the countdown without issuing a refresh. When the period elapses a
    /// quote request goes out and the countdown restarts.
    pub fn tick(&mut self, assets: &AssetPair, agent: &AgentState) {
        if !self.validator.is_request_valid(assets, agent) {
            self.stop();
            return;
        }

        if let Tick::Elapsed = self.countdown.tick() {
            tracing::info!("Quote refresh period elapsed, requesting new quote");
            self.requester.request_quote();
        }
    }

    /// Ask for a refresh now.
    ///
    /// Bursts within the debounce window collapse into a single invocation:
    /// each call replaces the pending deadline rather than adding one.
    pub fn request_immediate_refresh(&mut self, now: Instant) {
        let rescheduled = self.pending_refresh.is_some();
        self.pending_refresh = Some(now + QUOTE_DEBOUNCE);
        tracing::trace!(rescheduled, "Quote refresh debounce window armed");
    }

    /// Deadline of the pending debounced refresh, if one is armed.
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.pending_refresh
    }

    /// Execute the pending debounced refresh: request a quote, then restart
    /// the countdown from a full period. No-op when nothing is pending.
    pub fn fire_pending_refresh(&mut self) {
        if self.pending_refresh.take().is_none() {
            return;
        }

        tracing::debug!("Debounced quote refresh fired");
        self.requester.request_quote();
        self.stop();
        self.start();
    }
}
