use std::time::Duration;
use time::ext::NumericalStdDuration;

/// Seconds of the full quote refresh countdown.
pub const QUOTE_REFRESH_PERIOD_SECS: u64 = 60;

/// Window within which bursts of immediate refresh requests collapse into a
/// single invocation.
pub const QUOTE_DEBOUNCE: Duration = Duration::from_millis(800);

/// Cadence at which the displayed expiration deadlines are regenerated.
pub const EXPIRATION_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Escrow timing for a negotiation surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long after initiation locked funds become eligible for refund.
    pub refund_duration: Duration,
    /// How long after initiation an incomplete swap is considered failed.
    /// Always exceeds `refund_duration`.
    pub escrow_duration: Duration,
}

impl Config {
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.escrow_duration <= self.refund_duration {
            return Err(InvalidConfig {
                refund: self.refund_duration,
                escrow: self.escrow_duration,
            });
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("escrow duration {escrow:?} must exceed refund duration {refund:?}")]
pub struct InvalidConfig {
    pub refund: Duration,
    pub escrow: Duration,
}

pub trait GetConfig {
    fn get_config() -> Config;
}

#[derive(Clone, Copy)]
pub struct Mainnet;

#[derive(Clone, Copy)]
pub struct Testnet;

#[derive(Clone, Copy)]
pub struct Regtest;

impl GetConfig for Mainnet {
    fn get_config() -> Config {
        Config {
            refund_duration: 12.std_hours(),
            escrow_duration: 24.std_hours(),
        }
    }
}

impl GetConfig for Testnet {
    fn get_config() -> Config {
        Config {
            refund_duration: 1.std_hours(),
            escrow_duration: 2.std_hours(),
        }
    }
}

impl GetConfig for Regtest {
    fn get_config() -> Config {
        Config {
            refund_duration: 5.std_minutes(),
            escrow_duration: 10.std_minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_presets_are_valid() {
        Mainnet::get_config().validate().unwrap();
        Testnet::get_config().validate().unwrap();
        Regtest::get_config().validate().unwrap();
    }

    #[test]
    fn escrow_not_exceeding_refund_is_rejected() {
        let config = Config {
            refund_duration: Duration::from_secs(60),
            escrow_duration: Duration::from_secs(60),
        };

        assert!(config.validate().is_err());
    }
}
