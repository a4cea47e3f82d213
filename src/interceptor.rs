//! Hooks that see every request before dispatch and every response before normalization.

use crate::transport::{TransportRequest, TransportResponse};
use crate::Result;

/// Inspects or rewrites an outgoing request after auth headers are merged.
///
/// Returning an error aborts the call before anything is sent.
///
/// # Examples
///
/// ```
/// use bsh_engine::{BshClient, TransportRequest};
/// use http::HeaderValue;
///
/// # fn example() -> Result<(), bsh_engine::Error> {
/// let client = BshClient::builder()
///     .host("https://api.example.com")
///     .request_interceptor(|request: &mut TransportRequest| -> bsh_engine::Result<()> {
///         request.headers.insert("x-client", HeaderValue::from_static("bsh-engine"));
///         Ok(())
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub trait RequestInterceptor: Send + Sync {
    /// Called once per request, in registration order.
    fn intercept(&self, request: &mut TransportRequest) -> Result<()>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(&mut TransportRequest) -> Result<()> + Send + Sync,
{
    fn intercept(&self, request: &mut TransportRequest) -> Result<()> {
        (self)(request)
    }
}

/// Inspects or rewrites a raw response before it becomes an envelope or an error.
pub trait ResponseInterceptor: Send + Sync {
    /// Called once per response, in registration order.
    fn intercept(&self, response: &mut TransportResponse) -> Result<()>;
}

impl<F> ResponseInterceptor for F
where
    F: Fn(&mut TransportResponse) -> Result<()> + Send + Sync,
{
    fn intercept(&self, response: &mut TransportResponse) -> Result<()> {
        (self)(response)
    }
}
