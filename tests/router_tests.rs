use std::sync::{Arc, Mutex};

use strata::middleware::{Next, from_fn};
use strata::{BoxedHandler, Method, Middleware, Request, Router, Routes, StatusCode};

type Trace = Arc<Mutex<String>>;

/// One middleware per id; each appends its id to `trace` before calling next.
fn marks(trace: &Trace, ids: &[&'static str]) -> Vec<Middleware> {
    ids.iter()
        .map(|&id| {
            let trace = Arc::clone(trace);
            Arc::new(from_fn(move |req: Request, next: Next| {
                trace.lock().unwrap().push_str(id);
                next.run(req)
            })) as Middleware
        })
        .collect()
}

/// Records `>id` on the way in and `<id` on the way out.
fn onion(trace: &Trace, id: &'static str) -> impl Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static {
    let trace = Arc::clone(trace);
    from_fn(move |req: Request, next: Next| {
        let trace = Arc::clone(&trace);
        async move {
            trace.lock().unwrap().push_str(&format!(">{id}"));
            let res = next.run(req).await;
            trace.lock().unwrap().push_str(&format!("<{id}"));
            res
        }
    })
}

async fn ok(_req: Request) -> StatusCode {
    StatusCode::OK
}

fn take(trace: &Trace) -> String {
    std::mem::take(&mut *trace.lock().unwrap())
}

#[tokio::test]
async fn scoped_middleware_matches_reference_tree() {
    let trace = Trace::default();
    let m = marks(&trace, &["1", "2", "3", "4", "5", "6"]);

    let mut app = Router::new();
    app.middlewares([m[0].clone(), m[1].clone()])
        .handle_func("GET /", ok)
        .group(|r| {
            r.middlewares([m[2].clone(), m[3].clone()])
                .handle_func("GET /foo", ok)
                .group(|r| {
                    r.middlewares([m[4].clone()])
                        .handle_func("GET /nested/foo", ok);
                });
        })
        .group(|r| {
            r.middlewares([m[5].clone()])
                .handle_func("GET /bar", ok);
        })
        .handle_func("GET /baz", ok);

    let cases = [
        ("root path",          Method::GET,  "/",           "12",    StatusCode::OK),
        ("foo path",           Method::GET,  "/foo",        "1234",  StatusCode::OK),
        ("nested foo path",    Method::GET,  "/nested/foo", "12345", StatusCode::OK),
        ("bar path",           Method::GET,  "/bar",        "126",   StatusCode::OK),
        ("baz path",           Method::GET,  "/baz",        "12",    StatusCode::OK),
        ("not found path",     Method::GET,  "/notfound",   "12",    StatusCode::NOT_FOUND),
        ("method not allowed", Method::POST, "/nested/foo", "12",    StatusCode::METHOD_NOT_ALLOWED),
    ];

    for (name, method, path, expected_trace, expected_status) in cases {
        take(&trace);
        let res = app.serve(Request::new(method, path)).await;
        assert_eq!(res.status_code(), expected_status, "{name}: status");
        assert_eq!(take(&trace), expected_trace, "{name}: middleware trace");
    }
}

#[tokio::test]
async fn route_chain_runs_as_an_onion() {
    let trace = Trace::default();
    let mut app = Router::new();
    let handler_trace = Arc::clone(&trace);
    app.group(|r| {
        r.middleware(onion(&trace, "m1"))
            .middleware(onion(&trace, "m2"))
            .handle_func("GET /", move |_req: Request| {
                handler_trace.lock().unwrap().push_str("|h|");
                async { "done" }
            });
    });

    let res = app.serve(Request::new(Method::GET, "/")).await;
    assert_eq!(res.body(), b"done");
    assert_eq!(take(&trace), ">m1>m2|h|<m2<m1");
}

#[tokio::test]
async fn global_chain_wraps_route_chain() {
    let trace = Trace::default();
    let mut app = Router::new();
    app.middleware(onion(&trace, "g"))
        .group(|r| {
            r.middleware(onion(&trace, "r"))
                .handle_func("GET /", ok);
        });

    app.serve(Request::new(Method::GET, "/")).await;
    assert_eq!(take(&trace), ">g>r<r<g");
}

#[tokio::test]
async fn group_middleware_stays_inside_the_group() {
    let trace = Trace::default();
    let m = marks(&trace, &["a", "b"]);

    let mut app = Router::new();
    app.group(|parent| {
        parent.handle_func("GET /before", ok);
        parent.group(|child| {
            child.middlewares([m[0].clone()])
                .handle_func("GET /child", ok);
        });
        parent.group(|sibling| {
            sibling.middlewares([m[1].clone()])
                .handle_func("GET /sibling", ok);
        });
        parent.handle_func("GET /after", ok);
    });
    app.handle_func("GET /outside", ok);

    for (path, expected) in [
        ("/before", ""),
        ("/child", "a"),
        ("/sibling", "b"),
        ("/after", ""),
        ("/outside", ""),
    ] {
        app.serve(Request::new(Method::GET, path)).await;
        assert_eq!(take(&trace), expected, "{path}");
    }
}

#[tokio::test]
async fn descendants_keep_the_chain_they_were_created_with() {
    let trace = Trace::default();
    let m = marks(&trace, &["1", "2", "3"]);

    let mut app = Router::new();
    app.group(|parent| {
        parent.middlewares([m[0].clone()]);
        parent.group(|early| {
            early.handle_func("GET /early", ok);
        });
        parent.middlewares([m[1].clone()]);
        parent.group(|late| {
            late.middlewares([m[2].clone()])
                .handle_func("GET /late", ok);
        });
        parent.handle_func("GET /parent", ok);
    });

    for (path, expected) in [("/early", "1"), ("/late", "123"), ("/parent", "12")] {
        app.serve(Request::new(Method::GET, path)).await;
        assert_eq!(take(&trace), expected, "{path}");
    }
}

#[tokio::test]
async fn route_middleware_can_short_circuit() {
    let mut app = Router::new();
    app.group(|admin| {
        admin
            .middleware(from_fn(|req: Request, next: Next| async move {
                if req.header("authorization").is_none() {
                    return strata::Response::status(StatusCode::UNAUTHORIZED);
                }
                next.run(req).await
            }))
            .handle_func("GET /admin", |_req: Request| async { "secret" });
    });

    let denied = app.serve(Request::new(Method::GET, "/admin")).await;
    assert_eq!(denied.status_code(), StatusCode::UNAUTHORIZED);

    let allowed = app
        .serve(Request::new(Method::GET, "/admin").with_header("Authorization", "Bearer t"))
        .await;
    assert_eq!(allowed.status_code(), StatusCode::OK);
    assert_eq!(allowed.body(), b"secret");
}

#[tokio::test]
async fn path_params_survive_the_chain() {
    let trace = Trace::default();
    let mut app = Router::new();
    app.group(|r| {
        r.middleware(onion(&trace, "p"))
            .handle_func("GET /users/{id}", |req: Request| async move {
                format!("user {}", req.param("id").unwrap_or("?"))
            });
    });

    let res = app.serve(Request::new(Method::GET, "/users/7")).await;
    assert_eq!(res.body(), b"user 7");
    assert_eq!(take(&trace), ">p<p");
}

#[tokio::test]
async fn global_middleware_overrides_content_type() {
    let mut app = Router::new();
    app.middleware(from_fn(|req: Request, next: Next| async move {
        let mut res = next.run(req).await;
        res.insert_header("content-type", "application/json");
        res
    }))
    .handle_func("GET /", |_req: Request| async { "x" });

    let res = app.serve(Request::new(Method::GET, "/")).await;
    let content_types: Vec<_> = res.headers().iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        .collect();
    assert_eq!(content_types.len(), 1);
    assert_eq!(res.header("content-type"), Some("application/json"));
    assert_eq!(res.body(), b"x");
}

#[tokio::test]
async fn scoped_middleware_annotates_the_request() {
    let mut app = Router::new();
    app.group(|api| {
        api.middleware(from_fn(|mut req: Request, next: Next| async move {
            let user = if req.header("authorization").is_some() { "alice" } else { "anonymous" };
            req.insert_header("x-user", user);
            next.run(req).await
        }))
        .handle_func("POST /notes", |req: Request| async move {
            format!(
                "{} wrote {}",
                req.header("x-user").unwrap_or("?"),
                String::from_utf8_lossy(req.body()),
            )
        });
    });

    let forged = Request::new(Method::POST, "/notes")
        .with_header("X-User", "root")
        .with_body("hi");
    let res = app.serve(forged).await;
    assert_eq!(res.body(), b"anonymous wrote hi");

    let signed = Request::new(Method::POST, "/notes")
        .with_header("authorization", "Bearer t")
        .with_body(&b"hello"[..]);
    let res = app.serve(signed).await;
    assert_eq!(res.body(), b"alice wrote hello");
}
