//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! Middleware wraps handlers in other handlers, and the multiplexer stores
//! whatever comes out of that wrapping. Every layer therefore has to speak
//! one interface: [`Handler`], stored behind an `Arc<dyn Handler>`.
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user writes this
//!        ↓ scope.handle_func("GET /", hello)
//! handler_fn(hello)                                ← HandlerFn adapter
//!        ↓ compose(route_chain, Arc::new(..))
//! m1(m2(HandlerFn(hello)))                         ← BoxedHandler
//!        ↓ mux.insert("GET /", ..)
//! handler.call(req)  at request time               ← one vtable call per layer
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Send + 'static` let tokio move the future across worker threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A heap-allocated, type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;

/// The unit of work a route resolves to.
///
/// Async functions are adapted with [`handler_fn`] (which is what
/// [`Routes::handle_func`](crate::Routes::handle_func) does). Implement the
/// trait directly for handlers that carry state, or for middleware that
/// needs to hold on to the `next` handler it wraps.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call(&self, req: Request) -> BoxFuture {
        (**self).call(req)
    }
}

/// Adapter returned by [`handler_fn`].
pub struct HandlerFn<F>(F);

/// Turns an async function into a [`Handler`].
///
/// Accepts anything shaped like
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// including closures returning `async move` blocks.
pub fn handler_fn<F, Fut, R>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    HandlerFn(f)
}

impl<F, Fut, R> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use super::*;

    #[tokio::test]
    async fn handler_fn_converts_return_value() {
        let h = handler_fn(|_req: Request| async { StatusCode::ACCEPTED });
        let res = h.call(Request::new(Method::GET, "/")).await;
        assert_eq!(res.status_code(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn arc_forwards_to_inner_handler() {
        let h: BoxedHandler = Arc::new(handler_fn(|req: Request| async move {
            format!("{} {}", req.method(), req.path())
        }));
        let res = Arc::clone(&h).call(Request::new(Method::POST, "/echo")).await;
        assert_eq!(res.body(), b"POST /echo");
    }
}
