//! Middleware layer.
//!
//! A middleware is a function from handler to handler: it receives the
//! `next` handler and returns a new one that runs code around it. That is
//! the whole contract. Cross-cutting concerns (structured tracing, request
//! ids, authentication-header inspection) live here.
//!
//! Chains compose *onion-style*: for `[m1, m2]` around handler `h`, the
//! composed handler is `m1(m2(h))`. `m1` sees the request first and the
//! response last.
//!
//! ```rust
//! use strata::middleware::{self, Next};
//! use strata::{Request, Response, Router, Routes};
//!
//! let mut app = Router::new();
//! app.middleware(middleware::trace())
//!    .middleware(middleware::from_fn(|req: Request, next: Next| async move {
//!        let mut res = next.run(req).await;
//!        res.insert_header("x-served-by", "strata");
//!        res
//!    }));
//! ```
//!
//! Built-in middleware:
//! - [`trace`] — per-request span with method, path, status, latency

mod trace;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

pub use trace::trace;

/// A stored middleware. Never invoked until a handler is registered (route
/// chains) or a request arrives (the global chain).
pub type Middleware = Arc<dyn Fn(BoxedHandler) -> BoxedHandler + Send + Sync>;

/// Wraps `handler` with `chain`, first entry outermost.
///
/// Folds from the back so the last registered middleware ends up closest to
/// the handler: `[m1, m2, m3]` yields `m1(m2(m3(handler)))`.
pub(crate) fn compose(chain: &[Middleware], handler: BoxedHandler) -> BoxedHandler {
    chain.iter().rev().fold(handler, |next, mw| mw(next))
}

/// The rest of the chain, as seen from inside a [`from_fn`] middleware.
pub struct Next(BoxedHandler);

impl Next {
    /// Passes the request on and resolves to whatever the inner layers return.
    pub async fn run(self, req: Request) -> Response {
        self.0.call(req).await
    }
}

/// Builds a middleware from an async function taking the request and the
/// [`Next`] continuation.
///
/// Skipping `next.run` short-circuits the chain: nothing further in is
/// called, and the returned response travels back out through the
/// middleware registered earlier.
pub fn from_fn<F, Fut, R>(f: F) -> impl Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    let f = Arc::new(f);
    move |next: BoxedHandler| Arc::new(FromFn { f: Arc::clone(&f), next }) as BoxedHandler
}

struct FromFn<F> {
    f: Arc<F>,
    next: BoxedHandler,
}

impl<F, Fut, R> Handler for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.f)(req, Next(Arc::clone(&self.next)));
        Box::pin(async move { fut.await.into_response() })
    }
}
