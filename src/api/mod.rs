pub mod access;
pub mod audit;
pub mod movies;
pub mod payload;

use crate::api_errors::AppError;
use crate::errors::GateResult;

/// Runs a store-bound closure on the blocking pool; sled I/O is synchronous.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> GateResult<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
