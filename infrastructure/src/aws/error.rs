//! SDK error translation.

use aws_sdk_ec2::error::{ProvideErrorMetadata, SdkError};
use aws_smithy_types::error::display::DisplayErrorContext;
use cloudops_domain::RemoteError;

/// Convert an SDK error into a [`RemoteError`].
///
/// Service errors keep the provider's code and message; anything that never
/// reached the service (dispatch, timeout, unparseable response) is a
/// transport error.
pub fn sdk_error<E, R>(operation: &str, err: SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match &err {
        SdkError::ServiceError(service) => {
            let inner = service.err();
            let message = inner
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| inner.to_string());
            let remote = RemoteError::provider(operation, message);
            match inner.code() {
                Some(code) => remote.with_code(code),
                None => remote,
            }
        }
        _ => RemoteError::Transport(format!("{}: {}", operation, DisplayErrorContext(&err))),
    }
}

/// Convert a request builder error (missing required member).
pub(crate) fn build_error(operation: &str, err: impl std::fmt::Display) -> RemoteError {
    RemoteError::provider(operation, format!("invalid request: {}", err))
}
