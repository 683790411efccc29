// Gateway orchestration module; pool mechanics stay behind the pool traits.
pub mod acquirer;
pub mod probe;

pub use probe::ProbeState;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::GatewayConfig;
use crate::errors::BeginError;
use crate::pool::TransactionPool;

// -----------------------------------------------------------------------------
// ----- ConnectionGateway -----------------------------------------------------

/// Front door for starting transactions. Bounds every begin with a
/// wall-clock timeout; after a timeout it switches to failing fast and
/// hands detection of recovery to a single background prober, so an
/// unreachable database costs each caller O(1) instead of a full timeout.
///
/// Construct once at startup and share; the pool's lifetime is owned by
/// the application.
#[derive(Debug)]
pub struct ConnectionGateway<P> {
    pool: Arc<P>,
    transaction_timeout: Duration,
    probe_interval: Duration,
    probe: Arc<ProbeState>,
}

// -----------------------------------------------------------------------------
// ----- ConnectionGateway: Public ---------------------------------------------

impl<P: TransactionPool> ConnectionGateway<P> {
    pub fn new(pool: Arc<P>, config: &GatewayConfig) -> Self {
        Self {
            pool,
            transaction_timeout: config.transaction_timeout,
            probe_interval: config.probe_interval,
            probe: Arc::new(ProbeState::new()),
        }
    }

    /// Begin a transaction, bounded by the configured timeout.
    ///
    /// While the prober is running this fails immediately with
    /// `Unreachable` and never touches the pool. A `Timeout` starts the
    /// prober (at most one) and is returned without waiting for recovery.
    /// Pool errors other than a timeout pass through unchanged and never
    /// trigger probing.
    pub async fn begin(&self) -> Result<P::Tx, BeginError<P::Error>> {
        if self.probe.is_probing() {
            return Err(BeginError::Unreachable);
        }

        match acquirer::begin_with_timeout(self.pool.clone(), self.transaction_timeout).await {
            Err(BeginError::Timeout) => {
                warn!(
                    "new transaction timed out after {:?}",
                    self.transaction_timeout
                );
                self.start_probing();
                Err(BeginError::Timeout)
            }
            other => other,
        }
    }

    /// True while the gateway is failing fast. For health checks holding an
    /// `Option<&ConnectionGateway<_>>`, `is_some_and(Self::is_unreachable)`
    /// reads an absent gateway as reachable.
    pub fn is_unreachable(&self) -> bool {
        self.probe.is_probing()
    }
}

// -----------------------------------------------------------------------------
// ----- ConnectionGateway: Private --------------------------------------------

impl<P: TransactionPool> ConnectionGateway<P> {
    fn start_probing(&self) {
        if !self.probe.try_start() {
            return;
        }

        info!(
            "database looks unreachable, probing every {:?}",
            self.probe_interval
        );

        tokio::spawn(probe::run(
            self.pool.clone(),
            self.probe.clone(),
            self.transaction_timeout,
            self.probe_interval,
        ));
    }
}

// -----------------------------------------------------------------------------
// -----------------------------------------------------------------------------
