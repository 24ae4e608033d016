//! # strata
//!
//! Ordered middleware chains and scoped route groups on top of a radix-tree
//! HTTP multiplexer.
//!
//! ## The contract
//!
//! Matching is the mux's job: method + path patterns, path parameters,
//! `404 Not Found`, `405 Method Not Allowed`. strata adds the part a bare
//! mux lacks, namely *what wraps around a handler*:
//!
//! - **Global middleware** — registered on the root [`Router`]. Runs once per
//!   request around the mux, including requests that match nothing.
//! - **Route middleware** — registered inside a [`group`](Routes::group).
//!   Baked into each handler registered through that group and its
//!   descendants, in registration order.
//! - **Groups nest** — a group starts from a snapshot of its parent's route
//!   middleware and extends it without touching the parent or its siblings.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use strata::{Request, Response, Router, Routes, Server, StatusCode, middleware};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut app = Router::new();
//!     app.middleware(middleware::trace())
//!         .handle_func("GET /", index)
//!         .group(|api| {
//!             api.middleware(middleware::from_fn(require_token))
//!                 .handle_func("GET /users/{id}", get_user);
//!         });
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn index(_req: Request) -> &'static str {
//!     "hello"
//! }
//!
//! async fn require_token(req: Request, next: middleware::Next) -> Response {
//!     if req.header("authorization").is_none() {
//!         return Response::status(StatusCode::UNAUTHORIZED);
//!     }
//!     next.run(req).await
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#))
//! }
//! ```

mod error;
mod handler;
mod mux;
mod request;
mod response;
mod router;
mod server;

pub mod health;
pub mod middleware;

pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, Handler, HandlerFn, handler_fn};
pub use http::{Method, StatusCode};
pub use middleware::Middleware;
pub use mux::Mux;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{Router, Routes, Scope};
pub use server::{DEFAULT_MAX_BODY_SIZE, Server};
