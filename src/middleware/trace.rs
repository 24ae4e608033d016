use std::time::Instant;

use tracing::{Instrument, info, info_span};

use super::{Next, from_fn};
use crate::handler::BoxedHandler;
use crate::request::Request;

/// Per-request span with method and path; logs status and latency once the
/// inner layers have answered.
///
/// Register it first on the root router so it also covers 404 and 405.
pub fn trace() -> impl Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static {
    from_fn(|req: Request, next: Next| async move {
        let span = info_span!("request", method = %req.method(), path = %req.path());
        let start = Instant::now();
        let res = next.run(req).instrument(span.clone()).await;
        span.in_scope(|| {
            info!(
                status = res.status_code().as_u16(),
                latency_us = start.elapsed().as_micros() as u64,
                "request completed"
            );
        });
        res
    })
}
