use std::sync::Arc;
use std::time::Duration;

use tokio::select;
use tokio::sync::oneshot;
use tokio::time::sleep;
use tracing::warn;

use crate::errors::BeginError;
use crate::pool::{Transaction, TransactionPool};

// -----------------------------------------------------------------------------
// ----- Bounded begin ---------------------------------------------------------

/// Races `pool.begin()` against a wall-clock timeout.
///
/// The underlying begin runs as its own task and reports through a
/// single-slot channel, so it can always deposit its result and exit even
/// when nobody is listening anymore. Most drivers cannot cancel an
/// in-flight begin, so when the timer wins the call is left running and a
/// reaper keeps the receiving end: if a transaction eventually shows up,
/// the reaper commits it so nothing stays open on the database side.
///
/// When result and timer are ready in the same poll, the result wins.
pub async fn begin_with_timeout<P>(
    pool: Arc<P>,
    timeout: Duration,
) -> Result<P::Tx, BeginError<P::Error>>
where
    P: TransactionPool,
{
    let (result_tx, mut result_rx) = oneshot::channel();

    tokio::spawn(async move {
        // The receiver outlives the begin call on every path, so the send
        // cannot fail while the task is alive.
        let _ = result_tx.send(pool.begin().await);
    });

    select! {
        biased;

        res = &mut result_rx => {
            res.expect("begin task dropped without reporting")
                .map_err(BeginError::Pool)
        }

        _ = sleep(timeout) => {
            tokio::spawn(reap(result_rx));
            Err(BeginError::Timeout)
        }
    }
}

// -----------------------------------------------------------------------------
// ----- Internal: Reaper ------------------------------------------------------

/// Waits out a begin call whose caller already gave up and releases the
/// transaction if one arrives. Late errors have no one left to report to.
async fn reap<T, E>(result_rx: oneshot::Receiver<Result<T, E>>)
where
    T: Transaction,
{
    match result_rx.await {
        Ok(Ok(tx)) => match tx.commit().await {
            Ok(()) => {
                warn!("transaction began after its caller timed out; committed to release it");
            }
            Err(e) => {
                warn!("failed to release transaction that began after timeout: {e}");
            }
        },
        Ok(Err(_)) | Err(_) => {}
    }
}

// -----------------------------------------------------------------------------
// -----------------------------------------------------------------------------
