//! Kubernetes health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from load-balancer. |
//!
//! Register them on the root, outside any group, so probes skip route-level
//! middleware such as authentication:
//!
//! ```rust,no_run
//! use strata::{Router, Routes, health};
//!
//! let mut app = Router::new();
//! app.handle_func("GET /healthz", health::liveness)
//!    .handle_func("GET /readyz", health::readiness);
//! ```

use crate::{Request, Response};

/// Liveness probe. Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe (default implementation). `200 OK` with body `"ready"`.
///
/// Swap in your own handler when readiness depends on warm-up or downstream
/// dependencies.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
