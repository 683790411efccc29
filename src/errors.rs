use thiserror::Error;

// -----------------------------------------------------------------------------
// ----- BeginError ------------------------------------------------------------

/// Everything `ConnectionGateway::begin` can fail with. `E` is the pool's
/// own error type, carried through untouched.
#[derive(Debug, Error)]
pub enum BeginError<E> {
    /// The begin call did not complete within the configured window.
    /// Retryable, and the trigger for fail-fast mode.
    #[error("new transaction timed out")]
    Timeout,

    /// The gateway is currently probing an unreachable database. Try again
    /// later; no backoff is applied on the caller's behalf.
    #[error("database unreachable, reachability probe in progress")]
    Unreachable,

    /// Any other failure surfaced by the pool's begin primitive, propagated
    /// verbatim and never interpreted.
    #[error("{0}")]
    Pool(E),
}

// -----------------------------------------------------------------------------
// ----- Tests -----------------------------------------------------------------


// -----------------------------------------------------------------------------
// -----------------------------------------------------------------------------
