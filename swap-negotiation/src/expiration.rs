use crate::env::{Config, EXPIRATION_REFRESH_INTERVAL};
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The two escrow deadlines, derived from a single reading of the clock.
///
/// The refund deadline is always the earlier one: an incomplete swap is
/// declared failed at `escrow_timeout_at`, after the initiating party's funds
/// became eligible for refund.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Expiration {
    pub generated_at: OffsetDateTime,
    pub refund_at: OffsetDateTime,
    pub escrow_timeout_at: OffsetDateTime,
}

impl Expiration {
    /// Derive both deadlines from the current wall-clock time.
    pub fn generate(config: &Config) -> Self {
        Self::generate_at(config, OffsetDateTime::now_utc())
    }

    fn generate_at(config: &Config, now: OffsetDateTime) -> Self {
        Self {
            generated_at: now,
            refund_at: now + config.refund_duration,
            escrow_timeout_at: now + config.escrow_duration,
        }
    }
}

/// Latest generated deadlines for display. Each refresh replaces the previous
/// value wholesale.
#[derive(Clone, Debug)]
pub struct ExpirationFeed {
    inner: watch::Receiver<Expiration>,
}

impl ExpirationFeed {
    pub fn latest(&self) -> Expiration {
        *self.inner.borrow()
    }

    /// Wait for the next refresh. Fails only once the refresher is gone.
    pub async fn changed(&mut self) -> anyhow::Result<Expiration> {
        self.inner.changed().await?;

        Ok(*self.inner.borrow())
    }
}

/// Regenerates the deadlines every [`EXPIRATION_REFRESH_INTERVAL`] until the
/// guard is dropped.
pub fn refresh(config: Config) -> (ExpirationFeed, RefreshGuard) {
    let (sender, receiver) = watch::channel(Expiration::generate(&config));

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(EXPIRATION_REFRESH_INTERVAL);
        // The first tick of an interval completes immediately; the initial
        // value already went out with the channel.
        interval.tick().await;

        loop {
            interval.tick().await;
            if sender.send(Expiration::generate(&config)).is_err() {
                tracing::trace!("All expiration feeds dropped, stopping refresh");
                break;
            }
        }
    });

    (ExpirationFeed { inner: receiver }, RefreshGuard { handle })
}

/// Aborts the refresh task when dropped so no timer outlives the owning
/// surface.
#[derive(Debug)]
pub struct RefreshGuard {
    handle: JoinHandle<()>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{GetConfig, Mainnet, Regtest, Testnet};

    #[test]
    fn escrow_timeout_strictly_exceeds_refund_deadline() {
        for config in [
            Mainnet::get_config(),
            Testnet::get_config(),
            Regtest::get_config(),
        ] {
            let expiration = Expiration::generate(&config);

            assert!(
                expiration.escrow_timeout_at - expiration.generated_at
                    > expiration.refund_at - expiration.generated_at
            );
            assert!(expiration.refund_at > expiration.generated_at);
        }
    }

    #[test]
    fn deadlines_are_offsets_from_generation_time() {
        let config = Regtest::get_config();
        let now = OffsetDateTime::now_utc();

        let expiration = Expiration::generate_at(&config, now);

        assert_eq!(expiration.generated_at, now);
        assert_eq!(expiration.refund_at, now + config.refund_duration);
        assert_eq!(expiration.escrow_timeout_at, now + config.escrow_duration);
    }

    #[tokio::test(start_paused = true)]
    async fn feed_replaces_value_on_each_refresh() {
        let (mut feed, _guard) = refresh(Regtest::get_config());
        let initial = feed.latest();

        let next = feed.changed().await.unwrap();

        assert!(next.generated_at >= initial.generated_at);
        assert_eq!(feed.latest(), next);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_guard_stops_the_feed() {
        let (mut feed, guard) = refresh(Regtest::get_config());
        drop(guard);

        assert!(feed.changed().await.is_err());
    }
}
