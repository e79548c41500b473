use mediflow_core::analysis::ServiceError;
use std::future::Future;
use std::time::Duration;

/// Bounds an analysis call; an elapsed deadline becomes `ServiceError::Timeout`.
pub(crate) async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, ServiceError>>,
) -> Result<T, ServiceError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("[Outbound] Call exceeded {:?}", limit);
            Err(ServiceError::Timeout(limit.as_secs()))
        }
    }
}
