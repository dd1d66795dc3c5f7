use crate::agent::Quote;
use crate::asset::{Currency, Party};
use crate::coordinator::{QuoteRefreshCoordinator, RequestQuote, RequestValidator};
use crate::market::NoCompatibleMarket;
use crate::reactor::NegotiationReactor;
use crate::store::NegotiationStore;
use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

#[derive(Debug)]
enum Command {
    AmountChanged {
        party: Party,
        amount: Option<Decimal>,
    },
    SelectAsset {
        party: Party,
        currency: Currency,
        respond: oneshot::Sender<Result<(), NoCompatibleMarket>>,
    },
    SetQuoteLocked(bool),
    QuoteReceived(Quote),
}

/// UI-facing surface of a running negotiation.
///
/// Dropping every handle tears the event loop down; teardown always stops the
/// countdown so no timer outlives the surface.
#[derive(Clone, Debug)]
pub struct EventLoopHandle {
    sender: mpsc::UnboundedSender<Command>,
}

impl EventLoopHandle {
    pub fn amount_changed(&self, party: Party, amount: Option<Decimal>) -> Result<()> {
        self.send(Command::AmountChanged { party, amount })
    }

    /// Apply a newly selected currency. Fails with [`NoCompatibleMarket`] if
    /// the agent cannot serve the resulting pair.
    pub async fn select_asset(&self, party: Party, currency: Currency) -> Result<()> {
        let (respond, response) = oneshot::channel();
        self.send(Command::SelectAsset {
            party,
            currency,
            respond,
        })?;

        response
            .await
            .context("Negotiation event loop shut down")??;

        Ok(())
    }

    pub fn quote_lock_changed(&self, locked: bool) -> Result<()> {
        self.send(Command::SetQuoteLocked(locked))
    }

    pub fn quote_received(&self, quote: Quote) -> Result<()> {
        self.send(Command::QuoteReceived(quote))
    }

    fn send(&self, command: Command) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| anyhow!("Negotiation event loop shut down"))
    }
}

/// Owns the negotiation state and every timer of the subsystem.
///
/// All callbacks funnel through one `select!` loop, so no two of them ever
/// run concurrently and stopping the coordinator synchronously prevents any
/// further tick.
pub struct EventLoop<S, V, Q> {
    store: S,
    reactor: NegotiationReactor<V, Q>,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl<S, V, Q> EventLoop<S, V, Q>
where
    S: NegotiationStore,
    V: RequestValidator,
    Q: RequestQuote,
{
    pub fn new(store: S, validator: V, requester: Q) -> (Self, EventLoopHandle) {
        let (sender, commands) = mpsc::unbounded_channel();
        let coordinator = QuoteRefreshCoordinator::new(validator, requester);

        (
            Self {
                store,
                reactor: NegotiationReactor::new(coordinator),
                commands,
            },
            EventLoopHandle { sender },
        )
    }

    /// Run until every handle is dropped, then hand the store back.
    pub async fn run(mut self) -> S {
        let mut tick = interval(Duration::from_secs(1));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let debounce = self.reactor.coordinator().debounce_deadline();

            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => break,
                    }
                }
                _ = tick.tick(), if self.reactor.coordinator().is_counting() => {
                    self.reactor
                        .coordinator_mut()
                        .tick(self.store.assets(), self.store.agent());
                }
                _ = sleep_until(debounce.unwrap_or_else(Instant::now)), if debounce.is_some() => {
                    self.reactor.coordinator_mut().fire_pending_refresh();
                    // The countdown just restarted; the first full second
                    // starts now.
                    tick.reset();
                }
            }
        }

        tracing::debug!("Negotiation surface torn down");
        self.reactor.coordinator_mut().stop();

        self.store
    }

    fn handle_command(&mut self, command: Command) {
        let now = Instant::now();

        match command {
            Command::AmountChanged { party, amount } => {
                self.reactor
                    .on_amount_changed(&mut self.store, party, amount, now);
            }
            Command::SelectAsset {
                party,
                currency,
                respond,
            } => {
                let result = self
                    .reactor
                    .select_asset(&mut self.store, party, currency, now);
                let _ = respond.send(result);
            }
            Command::SetQuoteLocked(locked) => {
                let was_locked = self.store.agent().quote_locked;
                self.store.set_quote_locked(locked);

                if was_locked != locked {
                    self.reactor.on_quote_lock_changed(&self.store, locked, now);
                }
            }
            Command::QuoteReceived(quote) => {
                tracing::debug!(id = %quote.id, "Quote received");
                self.store.set_quote(quote);
            }
        }
    }
}
