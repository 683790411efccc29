use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::gateway::acquirer;
use crate::pool::{Transaction, TransactionPool};

// -----------------------------------------------------------------------------
// ----- ProbeState ------------------------------------------------------------

/// The probing flag. At most one prober loop is alive whenever the flag is
/// set; the flag's lifetime and the loop's are 1:1. Reads are shared,
/// transitions exclusive.
#[derive(Debug, Default)]
pub struct ProbeState {
    probing: RwLock<bool>,
}

impl ProbeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_probing(&self) -> bool {
        *self.probing.read()
    }

    /// Idle -> Probing. True means the caller now owns the loop and must
    /// spawn it; false means another caller already did.
    pub(crate) fn try_start(&self) -> bool {
        let mut probing = self.probing.write();
        if *probing {
            return false;
        }
        *probing = true;
        true
    }

    pub(crate) fn stop(&self) {
        *self.probing.write() = false;
    }
}

// -----------------------------------------------------------------------------
// ----- Prober loop -----------------------------------------------------------

/// Retries the pool at a fixed interval until a begin succeeds, then
/// releases the probe transaction and clears the flag. Runs until the
/// database comes back; an operator restarting the process is the only
/// other way out of a permanent outage.
///
/// The caller must have won `ProbeState::try_start` before spawning this.
pub(crate) async fn run<P>(
    pool: Arc<P>,
    state: Arc<ProbeState>,
    timeout: Duration,
    interval: Duration,
) where
    P: TransactionPool,
{
    loop {
        sleep(interval).await;

        match acquirer::begin_with_timeout(pool.clone(), timeout).await {
            Ok(tx) => {
                if let Err(e) = tx.commit().await {
                    warn!("failed to release probe transaction: {e}");
                }
                state.stop();
                info!("database reachable again, resuming normal operation");
                return;
            }
            Err(e) => {
                debug!("reachability probe failed: {e}");
            }
        }
    }
}

// -----------------------------------------------------------------------------
// ----- Tests -----------------------------------------------------------------


// -----------------------------------------------------------------------------
// -----------------------------------------------------------------------------
