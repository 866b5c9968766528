use simpledns_domain::DomainError;
use std::future::Future;
use std::time::Duration;

/// Race `future` against `duration`; elapsing maps to `QueryTimeout`.
pub async fn with_deadline<T, F>(duration: Duration, future: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::QueryTimeout),
    }
}
