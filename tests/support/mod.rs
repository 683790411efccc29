use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::time::sleep;

use txgate::{Transaction, TransactionPool};

// -----------------------------------------------------------------------------
// ----- Tracing ---------------------------------------------------------------

/// Call at the top of a test to see gateway logs under RUST_LOG.
#[allow(dead_code)]
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

// -----------------------------------------------------------------------------
// ----- Script ----------------------------------------------------------------

/// One scripted outcome for a begin call. Once the script runs out, every
/// further begin succeeds instantly.
#[derive(Clone, Debug)]
pub enum Step {
    Begin { latency: Duration },
    Fail { message: &'static str },
}

#[allow(dead_code)]
pub fn slow(latency: Duration) -> Step {
    Step::Begin { latency }
}

#[allow(dead_code)]
pub fn failing(message: &'static str) -> Step {
    Step::Fail { message }
}

// -----------------------------------------------------------------------------
// ----- FakePool --------------------------------------------------------------

#[derive(Debug, Error)]
#[error("{0}")]
pub struct FakePoolError(pub &'static str);

#[derive(Debug, Default)]
pub struct Counters {
    /// begin() invocations, including ones that end in failure.
    pub calls: AtomicUsize,
    /// transactions actually handed out.
    pub begun: AtomicUsize,
    pub committed: AtomicUsize,
    pub rolled_back: AtomicUsize,
}

#[derive(Debug)]
pub struct FakePool {
    script: Mutex<VecDeque<Step>>,
    counters: Arc<Counters>,
}

impl FakePool {
    pub fn scripted(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into_iter().collect()),
            counters: Arc::new(Counters::default()),
        })
    }

    pub fn calls(&self) -> usize {
        self.counters.calls.load(Ordering::SeqCst)
    }

    pub fn begun(&self) -> usize {
        self.counters.begun.load(Ordering::SeqCst)
    }

    pub fn committed(&self) -> usize {
        self.counters.committed.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn rolled_back(&self) -> usize {
        self.counters.rolled_back.load(Ordering::SeqCst)
    }
}

impl TransactionPool for FakePool {
    type Tx = FakeTx;
    type Error = FakePoolError;

    async fn begin(&self) -> Result<FakeTx, FakePoolError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);

        // Pop before awaiting; the guard must not cross a suspension point.
        let step = self.script.lock().pop_front();

        match step {
            Some(Step::Begin { latency }) => {
                sleep(latency).await;
                self.counters.begun.fetch_add(1, Ordering::SeqCst);
                Ok(FakeTx {
                    counters: self.counters.clone(),
                })
            }
            Some(Step::Fail { message }) => Err(FakePoolError(message)),
            None => {
                self.counters.begun.fetch_add(1, Ordering::SeqCst);
                Ok(FakeTx {
                    counters: self.counters.clone(),
                })
            }
        }
    }
}

// -----------------------------------------------------------------------------
// ----- FakeTx ----------------------------------------------------------------

#[derive(Debug)]
pub struct FakeTx {
    counters: Arc<Counters>,
}

impl Transaction for FakeTx {
    type Error = FakePoolError;

    async fn commit(self) -> Result<(), FakePoolError> {
        self.counters.committed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self) -> Result<(), FakePoolError> {
        self.counters.rolled_back.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// -----------------------------------------------------------------------------
