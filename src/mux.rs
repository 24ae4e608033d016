//! Radix-tree request multiplexer.
//!
//! One tree per HTTP method plus one for method-less patterns. O(path-length)
//! lookup. The mux knows nothing about middleware: it stores whatever handler
//! it is given and picks one per request. Wrapping happens in
//! [`router`](crate::router).
//!
//! # Patterns
//!
//! ```text
//! "GET /users/{id}"    GET (and HEAD) on /users/42
//! "POST /users"        POST only
//! "/files/{*path}"     every method, catch-all tail
//! ```
//!
//! Path syntax is matchit's: `{name}` captures one segment, `{*name}` the rest.

use std::collections::HashMap;
use std::future::ready;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// The multiplexer every router in a tree registers into.
///
/// A [`Router`](crate::Router) allocates exactly one; scopes borrow it.
/// `Mux` is itself a [`Handler`]: it is the innermost layer the global
/// middleware chain wraps.
#[derive(Clone, Default)]
pub struct Mux {
    methods: HashMap<Method, MatchitRouter<BoxedHandler>>,
    any: MatchitRouter<BoxedHandler>,
}

enum Lookup {
    Found(BoxedHandler, HashMap<String, String>),
    MethodNotAllowed(String),
    NotFound,
}

impl Mux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `pattern`.
    ///
    /// Fails when the method token is not a valid HTTP method, the path does
    /// not start with `/`, or matchit rejects the path (bad syntax or a
    /// conflict with an already registered route for the same method).
    pub fn insert(&mut self, pattern: &str, handler: BoxedHandler) -> Result<(), Error> {
        let (method, path) = parse_pattern(pattern)?;
        let tree = match &method {
            Some(m) => self.methods.entry(m.clone()).or_default(),
            None => &mut self.any,
        };
        tree.insert(path, handler).map_err(|e| Error::route(pattern, e))?;
        debug!(method = ?method, path, "route registered");
        Ok(())
    }

    fn lookup(&self, method: &Method, path: &str) -> Lookup {
        let get_for_head = (*method == Method::HEAD).then_some(&Method::GET);
        let candidates = [Some(method), get_for_head]
            .into_iter()
            .flatten()
            .filter_map(|m| self.methods.get(m))
            .chain(std::iter::once(&self.any));

        for tree in candidates {
            if let Ok(matched) = tree.at(path) {
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                return Lookup::Found(BoxedHandler::clone(matched.value), params);
            }
        }

        let mut allowed: Vec<&str> = self.methods.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| m.as_str())
            .collect();
        if allowed.is_empty() {
            return Lookup::NotFound;
        }
        if allowed.contains(&"GET") && !allowed.contains(&"HEAD") {
            allowed.push("HEAD");
        }
        allowed.sort_unstable();
        Lookup::MethodNotAllowed(allowed.join(", "))
    }
}

impl Handler for Mux {
    fn call(&self, mut req: Request) -> BoxFuture {
        match self.lookup(&req.method, &req.path) {
            Lookup::Found(handler, params) => {
                req.params = params;
                handler.call(req)
            }
            Lookup::MethodNotAllowed(allow) => Box::pin(ready(
                Response::builder()
                    .status(StatusCode::METHOD_NOT_ALLOWED)
                    .header("allow", &allow)
                    .no_body(),
            )),
            Lookup::NotFound => Box::pin(ready(Response::status(StatusCode::NOT_FOUND))),
        }
    }
}

/// Splits `"GET /path"` into its method and path. A bare `"/path"` has no method.
fn parse_pattern(pattern: &str) -> Result<(Option<Method>, &str), Error> {
    let trimmed = pattern.trim();
    let (method, path) = match trimmed.split_once(char::is_whitespace) {
        Some((method, path)) => {
            let method = Method::from_bytes(method.as_bytes())
                .map_err(|_| Error::pattern(pattern, "unknown method token"))?;
            (Some(method), path.trim_start())
        }
        None => (None, trimmed),
    };
    if !path.starts_with('/') {
        return Err(Error::pattern(pattern, "path must start with `/`"));
    }
    Ok((method, path))
}
