//! Tests for route pattern compilation and ordered first-match
//! resolution.

use std::sync::Arc;

use http::Method;
use mockd::dispatcher::Handler;
use mockd::router::{MethodFilter, Route, RoutePattern, Router};
use mockd::{Error, Response};

fn noop_handler(tag: &'static str) -> Handler {
    Arc::new(move |_req| Response::text(tag).into())
}

fn route(method: MethodFilter, pattern: &str, tag: &'static str) -> Route {
    Route {
        method,
        pattern: RoutePattern::parse(pattern).expect("valid pattern"),
        handler: noop_handler(tag),
    }
}

fn tag_of(router: &Router, method: Method, path: &str) -> Option<String> {
    let m = router.route(&method, path)?;
    let reply = (m.handler)(mockd::Request::from(mockd::RawRequest {
        method: method.to_string(),
        url: path.to_string(),
        headers: vec![],
        body: vec![],
    }));
    match reply {
        mockd::Reply::Immediate(resp) => {
            Some(String::from_utf8(resp.body().unwrap_or_default().to_vec()).expect("utf8"))
        }
        mockd::Reply::Deferred(_) => None,
    }
}

#[test]
fn param_extraction() {
    let router = Router::new(vec![route(
        MethodFilter::Only(Method::GET),
        "/users/:id",
        "users",
    )]);
    let m = router.route(&Method::GET, "/users/42").expect("match");
    assert_eq!(m.pattern, "/users/:id");
    assert_eq!(m.params.len(), 1);
    assert_eq!(m.params[0].0.as_ref(), "id");
    assert_eq!(m.params[0].1, "42");
}

#[test]
fn extra_segments_do_not_match() {
    let router = Router::new(vec![route(
        MethodFilter::Only(Method::GET),
        "/users/:id",
        "users",
    )]);
    assert!(router.route(&Method::GET, "/users/42/extra").is_none());
    assert!(router.route(&Method::GET, "/users").is_none());
}

#[test]
fn nested_params() {
    let router = Router::new(vec![route(
        MethodFilter::Only(Method::GET),
        "/posts/:pid/comments/:cid",
        "comments",
    )]);
    let m = router
        .route(&Method::GET, "/posts/7/comments/9")
        .expect("match");
    assert_eq!(m.params[0].1, "7");
    assert_eq!(m.params[1].1, "9");
}

#[test]
fn method_specific_routes_do_not_cross_match() {
    let router = Router::new(vec![
        route(MethodFilter::Only(Method::GET), "/get", "get"),
        route(MethodFilter::Only(Method::POST), "/post", "post"),
    ]);
    assert!(router.route(&Method::GET, "/get").is_some());
    assert!(router.route(&Method::POST, "/get").is_none());
    assert!(router.route(&Method::GET, "/post").is_none());
}

#[test]
fn all_filter_matches_every_method() {
    let router = Router::new(vec![route(MethodFilter::Any, "/any", "any")]);
    for method in [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
    ] {
        assert!(router.route(&method, "/any").is_some(), "{method}");
    }
}

#[test]
fn first_registered_route_wins() {
    let router = Router::new(vec![
        route(MethodFilter::Only(Method::GET), "/users/:id", "first"),
        route(MethodFilter::Only(Method::GET), "/users/:id", "second"),
        route(MethodFilter::Any, "/users/:id", "wildcard"),
    ]);
    assert_eq!(
        tag_of(&router, Method::GET, "/users/1"),
        Some("first".to_string())
    );
    // Non-GET falls through the two GET entries to the ALL entry.
    assert_eq!(
        tag_of(&router, Method::DELETE, "/users/1"),
        Some("wildcard".to_string())
    );
}

#[test]
fn literal_beats_nothing_but_order_decides_overlap() {
    let router = Router::new(vec![
        route(MethodFilter::Only(Method::GET), "/users/:id", "param"),
        route(MethodFilter::Only(Method::GET), "/users/me", "literal"),
    ]);
    // The param route registered first shadows the literal one.
    assert_eq!(
        tag_of(&router, Method::GET, "/users/me"),
        Some("param".to_string())
    );
}

#[test]
fn percent_escapes_decoded_before_comparison() {
    let router = Router::new(vec![route(
        MethodFilter::Only(Method::GET),
        "/users/:id",
        "users",
    )]);
    let m = router
        .route(&Method::GET, "/users/ada%20lovelace")
        .expect("match");
    assert_eq!(m.params[0].1, "ada lovelace");
}

#[test]
fn trailing_slash_is_normalized() {
    let router = Router::new(vec![route(MethodFilter::Only(Method::GET), "/hello", "h")]);
    assert!(router.route(&Method::GET, "/hello").is_some());
    assert!(router.route(&Method::GET, "/hello/").is_some());
}

#[test]
fn root_path_matches_root_pattern() {
    let router = Router::new(vec![route(MethodFilter::Only(Method::GET), "/", "root")]);
    assert!(router.route(&Method::GET, "/").is_some());
    assert!(router.route(&Method::GET, "/x").is_none());
}

#[test]
fn duplicate_param_names_fail_registration() {
    let err = RoutePattern::parse("/a/:id/b/:id").expect_err("must fail");
    match err {
        Error::InvalidPattern { pattern, name } => {
            assert_eq!(pattern, "/a/:id/b/:id");
            assert_eq!(name, "id");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_router_matches_nothing() {
    let router = Router::new(vec![]);
    assert!(router.is_empty());
    assert!(router.route(&Method::GET, "/").is_none());
}
