//! Minimal strata example — public routes, an authenticated group with a
//! nested admin group, and health checks.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/healthz
//!   curl http://localhost:3000/users/42                          # 401
//!   curl -H 'authorization: Bearer t' http://localhost:3000/users/42
//!   curl -X DELETE -H 'authorization: Bearer t' \
//!        -H 'x-admin: yes' http://localhost:3000/users/42
//!   curl -X PUT http://localhost:3000/healthz                    # 405

use strata::middleware::{self, Next};
use strata::{Request, Response, Router, Routes, Server, StatusCode, health};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut app = Router::new();

    // Global: runs for every request, matched or not.
    app.middleware(middleware::trace())
        .handle_func("GET /healthz", health::liveness)
        .handle_func("GET /readyz", health::readiness)
        .group(|api| {
            api.middleware(middleware::from_fn(require_token))
                .handle_func("GET /users/{id}", get_user)
                .handle_func("POST /users", create_user)
                .group(|admin| {
                    // Inherits require_token, then adds its own check.
                    admin
                        .middleware(middleware::from_fn(require_admin))
                        .handle_func("DELETE /users/{id}", delete_user);
                });
        });

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

async fn require_token(req: Request, next: Next) -> Response {
    if req.header("authorization").is_none() {
        return Response::status(StatusCode::UNAUTHORIZED);
    }
    next.run(req).await
}

async fn require_admin(req: Request, next: Next) -> Response {
    if req.header("x-admin") != Some("yes") {
        return Response::status(StatusCode::FORBIDDEN);
    }
    next.run(req).await
}

// GET /users/{id}
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#))
}

// POST /users
//
// req.body() is &[u8] — parse with serde_json::from_slice, simd-json, etc.
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(r#"{"id":"99","name":"new_user"}"#)
}

// DELETE /users/{id} → 204 No Content
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}
