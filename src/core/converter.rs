//! Cached USD/INR exchange rate and the conversions built on it

use crate::core::currency::{Direction, RateSource};
use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// INR per USD used until the first successful fetch.
pub const DEFAULT_RATE: f64 = 83.12;

/// How long a fetched rate is considered fresh.
pub const CACHE_DURATION: Duration = Duration::from_secs(60 * 60);

/// What `get_rate` does when the cached rate is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Wait for the fetch before answering.
    #[default]
    Inline,
    /// Start the fetch on the runtime and answer with the cached rate.
    Background,
    /// Never fetch implicitly.
    Never,
}

#[derive(Debug, Clone, Copy)]
pub struct ConverterSettings {
    pub default_rate: f64,
    pub cache_duration: Duration,
    pub policy: RefreshPolicy,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        ConverterSettings {
            default_rate: DEFAULT_RATE,
            cache_duration: CACHE_DURATION,
            policy: RefreshPolicy::default(),
        }
    }
}

/// Point in time view of the cached rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSnapshot {
    pub rate: f64,
    pub updated_at: Option<DateTime<Local>>,
}

impl RateSnapshot {
    /// True once a fetch has succeeded.
    pub fn is_live(&self) -> bool {
        self.updated_at.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
struct LastUpdated {
    at: Instant,
    wall: DateTime<Local>,
}

// rate and last_updated always change together
#[derive(Debug, Clone, Copy)]
struct RateState {
    rate: f64,
    last_updated: Option<LastUpdated>,
}

struct Shared {
    state: RwLock<RateState>,
    fetch_gate: Arc<Mutex<()>>,
    source: Arc<dyn RateSource>,
    cache_duration: Duration,
    policy: RefreshPolicy,
}

impl Shared {
    fn read(&self) -> RateState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_stale(&self) -> bool {
        match self.read().last_updated {
            None => true,
            Some(updated) => Instant::now().duration_since(updated.at) > self.cache_duration,
        }
    }

    /// Runs one fetch. Callers must hold `fetch_gate`.
    async fn fetch_locked(&self) -> bool {
        match self.source.fetch_rate().await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => {
                let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                *state = RateState {
                    rate,
                    last_updated: Some(LastUpdated {
                        at: Instant::now(),
                        wall: Local::now(),
                    }),
                };
                info!(rate, "Exchange rate updated");
                true
            }
            Ok(rate) => {
                warn!(rate, "Rejected invalid exchange rate");
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch exchange rate");
                false
            }
        }
    }
}

/// Owns the current exchange rate and refreshes it when it goes stale.
///
/// Clones share the same cached rate.
#[derive(Clone)]
pub struct Converter {
    shared: Arc<Shared>,
}

impl Converter {
    pub fn new(source: Arc<dyn RateSource>, settings: ConverterSettings) -> Result<Self> {
        if !settings.default_rate.is_finite() || settings.default_rate <= 0.0 {
            bail!(
                "Default exchange rate must be a positive number, got {}",
                settings.default_rate
            );
        }

        Ok(Converter {
            shared: Arc::new(Shared {
                state: RwLock::new(RateState {
                    rate: settings.default_rate,
                    last_updated: None,
                }),
                fetch_gate: Arc::new(Mutex::new(())),
                source,
                cache_duration: settings.cache_duration,
                policy: settings.policy,
            }),
        })
    }

    /// Fetches a fresh rate, waiting for any fetch already in flight first.
    ///
    /// Returns false and keeps the previous rate on any failure.
    #[instrument(name = "FetchRate", skip(self))]
    pub async fn fetch_rate(&self) -> bool {
        let _guard = self.shared.fetch_gate.lock().await;
        self.shared.fetch_locked().await
    }

    /// Current rate, refreshed first according to the policy when stale.
    ///
    /// Never waits on a fetch started by someone else.
    pub async fn get_rate(&self) -> f64 {
        if self.shared.is_stale() {
            match self.shared.policy {
                RefreshPolicy::Inline => self.refresh_inline().await,
                RefreshPolicy::Background => self.refresh_in_background(),
                RefreshPolicy::Never => debug!("Cached rate is stale, live fetch disabled"),
            }
        }
        self.shared.read().rate
    }

    pub async fn convert(&self, amount: f64, direction: Direction) -> f64 {
        let rate = self.get_rate().await;
        match direction {
            Direction::ToTarget => amount * rate,
            Direction::ToSource => amount / rate,
        }
    }

    pub fn snapshot(&self) -> RateSnapshot {
        let state = self.shared.read();
        RateSnapshot {
            rate: state.rate,
            updated_at: state.last_updated.map(|u| u.wall),
        }
    }

    pub fn is_stale(&self) -> bool {
        self.shared.is_stale()
    }

    async fn refresh_inline(&self) {
        let Ok(_guard) = self.shared.fetch_gate.try_lock() else {
            debug!("Refresh already in flight, using cached rate");
            return;
        };
        // another fetch may have finished between the check and the lock
        if self.shared.is_stale() {
            self.shared.fetch_locked().await;
        }
    }

    fn refresh_in_background(&self) {
        let Ok(guard) = Arc::clone(&self.shared.fetch_gate).try_lock_owned() else {
            debug!("Refresh already in flight, using cached rate");
            return;
        };
        if !self.shared.is_stale() {
            return;
        }
        debug!("Starting background refresh");
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            shared.fetch_locked().await;
            drop(guard);
        });
    }
}
