// pool.rs
//! Collaborator contract for the underlying connection pool.
//! The gateway never opens or closes connections itself; it only needs a
//! way to start a transaction and to terminate one it ends up owning.

use std::future::Future;

// -----------------------------------------------------------------------------
// ----- Transaction -----------------------------------------------------------

/// A unit-of-work handle obtained from the pool. Whoever owns it must
/// eventually call exactly one of `commit` or `rollback`.
pub trait Transaction: Send + 'static {
    type Error: std::error::Error + Send + 'static;

    fn commit(self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn rollback(self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

// -----------------------------------------------------------------------------
// ----- TransactionPool -------------------------------------------------------

/// The single primitive this layer requires from a pool: begin a
/// transaction. The call may be slow or hang outright; the gateway bounds
/// it, the pool does not have to.
///
/// The pool is shared and must be safe for concurrent use; its lifetime is
/// owned by the application, never by the gateway.
pub trait TransactionPool: Send + Sync + 'static {
    type Tx: Transaction;
    type Error: std::error::Error + Send + 'static;

    fn begin(&self) -> impl Future<Output = Result<Self::Tx, Self::Error>> + Send;
}

// -----------------------------------------------------------------------------
// -----------------------------------------------------------------------------
