//! End-to-end dispatch tests for the gateway.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fastcgi_gateway::{
    Gateway, Handling, Method, RequestContext, RequestOutcome, Route, Router,
};

mod common;
use common::{drive, env, expect_response, request_env};

#[test]
fn test_registered_handler_produces_the_response() {
    let mut router = Router::new();
    router
        .register(Method::Get, "/books/:id", Route::new(|req: &mut RequestContext| {
            req.response_mut().write_str("ok");
            Handling::RespondAccept
        }))
        .unwrap();
    let gateway = Gateway::new(router);

    let response = expect_response(drive(&gateway, "GET", "/books/7"));
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), b"ok");
}

#[test]
fn test_not_found_chain_handles_unmatched_paths() {
    let mut router = Router::new();
    router
        .register(Method::Get, "/books/:id", Route::new(|req: &mut RequestContext| {
            req.response_mut().write_str("ok");
            Handling::RespondAccept
        }))
        .unwrap();
    router.set_not_found(Route::new(|req: &mut RequestContext| {
        req.response_mut().set_status(404);
        Handling::RespondAccept
    }));
    let gateway = Gateway::new(router);

    let response = expect_response(drive(&gateway, "GET", "/movies/7"));
    assert_eq!(response.status(), 404);

    // The registered path still resolves normally.
    let response = expect_response(drive(&gateway, "GET", "/books/7"));
    assert_eq!(response.status(), 200);
}

#[test]
fn test_unroutable_without_not_found_chain() {
    let gateway = Gateway::new(Router::new());
    assert!(matches!(
        drive(&gateway, "GET", "/anywhere"),
        RequestOutcome::Unroutable
    ));
}

#[test]
fn test_wrong_method_falls_through_to_not_found() {
    let mut router = Router::new();
    router
        .register(Method::Get, "/only-get", Route::new(|_: &mut RequestContext| {
            Handling::RespondAccept
        }))
        .unwrap();
    router.set_not_found(Route::new(|req: &mut RequestContext| {
        req.response_mut().set_status(405);
        Handling::RespondAccept
    }));
    let gateway = Gateway::new(router);

    let response = expect_response(drive(&gateway, "POST", "/only-get"));
    assert_eq!(response.status(), 405);
}

#[test]
fn test_middleware_chain_reaches_the_handler() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut route = Route::new({
        let counter = Arc::clone(&counter);
        move |req: &mut RequestContext| {
            let seen = counter.load(Ordering::SeqCst);
            req.response_mut().write_str(&format!("middleware:{seen}"));
            Handling::RespondAccept
        }
    });
    for _ in 0..5 {
        let counter = Arc::clone(&counter);
        route = route.middleware(move |req: &mut RequestContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            req.next().unwrap_or(Handling::IgnoreTerm)
        });
    }

    let mut router = Router::new();
    router.register(Method::Get, "/chained", route).unwrap();
    let gateway = Gateway::new(router);

    let response = expect_response(drive(&gateway, "GET", "/chained"));
    assert_eq!(response.body(), b"middleware:5");
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[test]
fn test_middleware_short_circuit_skips_the_handler() {
    let counter = Arc::new(AtomicUsize::new(0));
    let handler_ran = Arc::new(AtomicUsize::new(0));

    let mut route = Route::new({
        let handler_ran = Arc::clone(&handler_ran);
        move |_: &mut RequestContext| {
            handler_ran.fetch_add(1, Ordering::SeqCst);
            Handling::RespondAccept
        }
    });
    // Two counting middleware, then one that answers without advancing,
    // then two more that must never run.
    for _ in 0..2 {
        let counter = Arc::clone(&counter);
        route = route.middleware(move |req: &mut RequestContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            req.next().unwrap_or(Handling::IgnoreTerm)
        });
    }
    route = route.middleware(|req: &mut RequestContext| {
        req.response_mut().set_status(403);
        req.response_mut().write_str("denied");
        Handling::RespondTerm
    });
    for _ in 0..2 {
        let counter = Arc::clone(&counter);
        route = route.middleware(move |req: &mut RequestContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            req.next().unwrap_or(Handling::IgnoreTerm)
        });
    }

    let mut router = Router::new();
    router.register(Method::Get, "/guarded", route).unwrap();
    let gateway = Gateway::new(router);

    match drive(&gateway, "GET", "/guarded") {
        RequestOutcome::Completed {
            response: Some(response),
            keep_accepting,
        } => {
            assert_eq!(response.status(), 403);
            assert_eq!(response.body(), b"denied");
            assert!(!keep_accepting);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(handler_ran.load(Ordering::SeqCst), 0);
}

#[test]
fn test_handler_reads_query_and_body() {
    let mut router = Router::new();
    router
        .register(Method::Post, "/echo", Route::new(|req: &mut RequestContext| {
            let name = req.query("name").unwrap_or("anonymous").to_string();
            let body = String::from_utf8_lossy(req.body(0)).into_owned();
            let response = req.response_mut();
            response.set_content_type("text/plain");
            response.write_str(&format!("{name}:{body}"));
            Handling::RespondAccept
        }))
        .unwrap();
    let gateway = Gateway::new(router);

    let outcome = gateway.handle(
        env(&[
            "REQUEST_METHOD=POST",
            "DOCUMENT_URI=/echo",
            "QUERY_STRING=name=tea+pot",
            "CONTENT_LENGTH=5",
        ]),
        io::Cursor::new(b"hello".to_vec()),
        io::sink(),
    );
    let response = expect_response(outcome);
    assert_eq!(response.content_type(), Some("text/plain"));
    assert_eq!(response.body(), b"tea pot:hello");
}

#[test]
fn test_wildcard_route_spans_suffixes() {
    let served = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    router
        .register(Method::Get | Method::Post, "/static/*", Route::new({
            let served = Arc::clone(&served);
            move |_: &mut RequestContext| {
                served.fetch_add(1, Ordering::SeqCst);
                Handling::RespondAccept
            }
        }))
        .unwrap();
    let gateway = Gateway::new(router);

    for path in ["/static/", "/static/css/site.css"] {
        expect_response(drive(&gateway, "GET", path));
    }
    expect_response(drive(&gateway, "POST", "/static/upload"));
    // The bare prefix does not reach the wildcard node.
    assert!(matches!(
        drive(&gateway, "GET", "/static"),
        RequestOutcome::Unroutable
    ));
    assert_eq!(served.load(Ordering::SeqCst), 3);
}

#[test]
fn test_response_serialization_round_trip() {
    let mut router = Router::new();
    router
        .register(Method::Get, "/page", Route::new(|req: &mut RequestContext| {
            let response = req.response_mut();
            response.set_status(201);
            response.set_content_type("text/html");
            response.write_str("<p>done</p>");
            Handling::RespondAccept
        }))
        .unwrap();
    let gateway = Gateway::new(router);

    let response = expect_response(drive(&gateway, "GET", "/page"));
    let mut wire = Vec::new();
    response.serialize_into(&mut wire).unwrap();
    let text = String::from_utf8(wire).unwrap();

    assert!(text.contains("Status: 201\r\n"));
    assert!(text.contains("Content-Type: text/html\r\n"));
    assert!(text.ends_with("\r\n\r\n<p>done</p>"));
}

#[test]
fn test_request_headers_flow_through_the_environment() {
    let mut router = Router::new();
    router
        .register(Method::Get, "/inspect", Route::new(|req: &mut RequestContext| {
            let agent = req.header("User-Agent").unwrap_or("none").to_string();
            let lang_count = req.headers().count("Accept-Language");
            req.response_mut()
                .write_str(&format!("{agent}/{lang_count}"));
            Handling::RespondAccept
        }))
        .unwrap();
    let gateway = Gateway::new(router);

    let mut environment = request_env("GET", "/inspect");
    environment.push("HTTP_USER_AGENT=integration-test".to_string());
    environment.push("HTTP_ACCEPT_LANGUAGE=en".to_string());
    environment.push("HTTP_ACCEPT_LANGUAGE=ja".to_string());

    let response = expect_response(gateway.handle(environment, io::empty(), io::sink()));
    assert_eq!(response.body(), b"integration-test/2");
}

#[test]
fn test_diagnostic_channel_bypasses_the_body() {
    struct SharedSink(Arc<std::sync::Mutex<Vec<u8>>>);
    impl io::Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let diag = Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut router = Router::new();
    router
        .register(Method::Get, "/warn", Route::new(|req: &mut RequestContext| {
            req.write_diagnostic("cache miss for /warn");
            req.response_mut().write_str("body");
            Handling::RespondAccept
        }))
        .unwrap();
    let gateway = Gateway::new(router);

    let response = expect_response(gateway.handle(
        request_env("GET", "/warn"),
        io::empty(),
        SharedSink(Arc::clone(&diag)),
    ));
    assert_eq!(response.body(), b"body");
    assert_eq!(diag.lock().unwrap().as_slice(), b"cache miss for /warn");
}
