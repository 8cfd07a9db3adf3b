//! Scoped transaction wrapping for terminal statement execution.

use tracing::warn;

use crate::connection::DatabaseConnection;
use crate::error::DataSetError;
use crate::metadata::{TransactionOptions, TxScope};

/// Run `body` under the transaction policy carried by `options`.
///
/// Scoped-acquisition-with-guaranteed-release: the scope commits when the body
/// returns `Ok`, and rolls back on any error, re-raising the body's error
/// unchanged. Scope semantics:
///
/// * [`TxScope::Required`] — join an already-open transaction (leaving
///   commit/rollback to its owner), otherwise begin and settle a new one;
/// * [`TxScope::RequiresNew`] — always begin a new scope, nesting inside an
///   open transaction where the driver supports it;
/// * [`TxScope::Suppress`] — execute directly with no scope.
///
/// # Errors
/// Returns the body's error after rolling back, or a `DataSetError` from
/// begin/commit themselves. A rollback failure is logged and does not mask the
/// body's error.
pub fn run_scoped<C, T, F>(
    conn: &mut C,
    options: &TransactionOptions,
    body: F,
) -> Result<T, DataSetError>
where
    C: DatabaseConnection + ?Sized,
    F: FnOnce(&mut C) -> Result<T, DataSetError>,
{
    match options.scope {
        TxScope::Suppress => body(conn),
        TxScope::Required if conn.in_transaction() => body(conn),
        TxScope::Required | TxScope::RequiresNew => {
            conn.begin(options)?;
            match body(conn) {
                Ok(value) => {
                    conn.commit()?;
                    Ok(value)
                }
                Err(err) => {
                    if let Err(rollback_err) = conn.rollback() {
                        warn!(error = %rollback_err, "transaction rollback failed");
                    }
                    Err(err)
                }
            }
        }
    }
}
