//! Root router, scoped groups, and middleware inheritance.
//!
//! A router tree has exactly one [`Mux`]. The root [`Router`] owns it together
//! with the *global chain*: middleware applied around the mux itself, once per
//! request, whether or not a route matched. Every [`Scope`] below it borrows
//! the same mux and carries a *route chain*: middleware baked into each
//! handler registered through that scope.
//!
//! ```text
//! Router   global: [trace]                 mux ◄──────────────┐
//!  ├─ GET /              (global only)                        │
//!  └─ group  route: [auth]                 &mut mux ──────────┤
//!      ├─ GET /me        auth(me)                             │
//!      └─ group  route: [auth, audit]      &mut mux ──────────┘
//!          └─ POST /admin  auth(audit(admin))
//! ```
//!
//! A group starts from a copy of its parent's route chain at the moment
//! [`Routes::group`] is called. Adding middleware to a parent afterwards
//! changes nothing for groups already built, and nothing a group adds
//! leaks back out.

use std::future::Future;
use std::iter;
use std::sync::Arc;

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler, handler_fn};
use crate::middleware::{Middleware, compose};
use crate::mux::Mux;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Registration surface shared by [`Router`] and [`Scope`].
///
/// All methods return `&mut Self` so registrations chain:
///
/// ```rust
/// use strata::{Request, Router, Routes};
/// # async fn index(_: Request) -> &'static str { "" }
/// # async fn me(_: Request) -> &'static str { "" }
/// # fn auth() -> impl Fn(strata::BoxedHandler) -> strata::BoxedHandler + Send + Sync + 'static { |h| h }
/// let mut app = Router::new();
/// app.handle_func("GET /", index)
///    .group(|api| {
///        api.middleware(auth())
///           .handle_func("GET /me", me);
///    });
/// ```
pub trait Routes {
    /// Appends middleware to this node's chain. On the root this is the
    /// global chain; on a [`Scope`] it is the route chain.
    fn middlewares<I>(&mut self, mws: I) -> &mut Self
    where
        I: IntoIterator<Item = Middleware>;

    /// Wraps `handler` with this node's route chain and registers it with the
    /// shared mux. Returns the mux's error if it rejects `pattern`.
    fn try_handle<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error>;

    /// Runs `f` with a child scope whose route chain starts as a copy of this
    /// node's. The scope is borrowed for the duration of `f` and cannot
    /// outlive it.
    fn group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Scope<'_>);

    /// Appends a single middleware. See [`middlewares`](Routes::middlewares).
    fn middleware<M>(&mut self, mw: M) -> &mut Self
    where
        M: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
    {
        self.middlewares(iter::once(Arc::new(mw) as Middleware))
    }

    /// Like [`try_handle`](Routes::try_handle), for use at startup.
    ///
    /// # Panics
    ///
    /// Panics if the mux rejects `pattern` (bad syntax, unknown method,
    /// or a conflict with a route already registered).
    fn handle<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        match self.try_handle(pattern, handler) {
            Ok(this) => this,
            Err(e) => panic!("{e}"),
        }
    }

    /// Registers an async function as the handler for `pattern`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`handle`](Routes::handle).
    fn handle_func<F, Fut, R>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + Send + 'static,
    {
        self.handle(pattern, handler_fn(f))
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// The root of a router tree and the entry point for every request.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve)
/// or call [`serve`](Router::serve) yourself.
pub struct Router {
    global: Vec<Middleware>,
    mux: Arc<Mux>,
}

impl Router {
    /// An empty router with a freshly allocated mux.
    pub fn new() -> Self {
        Self { global: Vec::new(), mux: Arc::new(Mux::new()) }
    }

    /// Dispatches one request: global chain first, then the mux, then the
    /// matched route's own chain and handler.
    ///
    /// The global chain is composed on every call, so middleware added to the
    /// root between two requests applies from the second one on.
    pub async fn serve(&self, req: Request) -> Response {
        let mux: BoxedHandler = Arc::clone(&self.mux) as BoxedHandler;
        compose(&self.global, mux).call(req).await
    }

    /// The mux is only ever shared during `serve`; registration happens
    /// before serving starts, so this does not clone in practice.
    fn mux_mut(&mut self) -> &mut Mux {
        Arc::make_mut(&mut self.mux)
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

impl Routes for Router {
    fn middlewares<I>(&mut self, mws: I) -> &mut Self
    where
        I: IntoIterator<Item = Middleware>,
    {
        self.global.extend(mws);
        self
    }

    // The root has no route chain: routes registered here are covered by
    // the global chain at request time and by nothing else.
    fn try_handle<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.mux_mut().insert(pattern, Arc::new(handler))?;
        Ok(self)
    }

    fn group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Scope<'_>),
    {
        f(&mut Scope { chain: Vec::new(), mux: self.mux_mut() });
        self
    }
}

// ── Scope ─────────────────────────────────────────────────────────────────────

/// A group of routes sharing a route chain.
///
/// Only reachable as the argument of a [`Routes::group`] callback; it borrows
/// the tree's mux and is gone once the callback returns.
pub struct Scope<'a> {
    chain: Vec<Middleware>,
    mux: &'a mut Mux,
}

impl Routes for Scope<'_> {
    fn middlewares<I>(&mut self, mws: I) -> &mut Self
    where
        I: IntoIterator<Item = Middleware>,
    {
        self.chain.extend(mws);
        self
    }

    fn try_handle<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        let composed = compose(&self.chain, Arc::new(handler));
        self.mux.insert(pattern, composed)?;
        Ok(self)
    }

    fn group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Scope<'_>),
    {
        f(&mut Scope { chain: self.chain.clone(), mux: &mut *self.mux });
        self
    }
}
