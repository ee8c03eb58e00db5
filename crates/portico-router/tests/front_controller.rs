//! End-to-end dispatch over the blog route table.

use std::sync::{Arc, Mutex};

use portico_router::{
    Dispatcher, HandlerRegistry, Outcome, PathPattern, Request, Response, RouteTable, RouterError,
};

/// Records every invocation as `(handler, positional args)`.
type CallLog = Arc<Mutex<Vec<(String, Vec<String>)>>>;

fn table() -> RouteTable {
    RouteTable::builder()
        .get("/", "HomeController@index")
        .get("/blog", "BlogController@index")
        .get("/blog/show", "BlogController@show")
        .get("/blog/:id", "BlogController@item")
        .get("/blog/cat/:category", "BlogController@category")
        .get("/show/:category/:title/:id", "ShowController@detail")
        .get("/dashboard", "DashBoardController@index::auth")
        .post("/dashboard/update", "DashBoardController@update::auth")
        .delete("/dashboard/delete", "DashBoardController@delete::auth")
        .build()
        .unwrap()
}

fn dispatcher(log: &CallLog) -> Dispatcher<bool> {
    let handlers: [(&str, &[&str]); 9] = [
        ("HomeController@index", &[]),
        ("BlogController@index", &[]),
        ("BlogController@show", &[]),
        ("BlogController@item", &["id"]),
        ("BlogController@category", &["category"]),
        ("ShowController@detail", &["category", "title", "id"]),
        ("DashBoardController@index", &[]),
        ("DashBoardController@update", &[]),
        ("DashBoardController@delete", &[]),
    ];

    let mut registry: HandlerRegistry<bool> = HandlerRegistry::new();
    for (id, params) in handlers {
        let log = Arc::clone(log);
        let name = id.to_string();
        registry
            .register(id, params, move |ctx| {
                let args: Vec<String> = ctx.args().into_iter().map(String::from).collect();
                log.lock().unwrap().push((name.clone(), args));
                Response::text(name.clone())
            })
            .unwrap();
    }
    Dispatcher::new(table(), registry).unwrap()
}

fn calls(log: &CallLog) -> Vec<(String, Vec<String>)> {
    log.lock().unwrap().clone()
}

#[test]
fn test_category_invoked_with_param() {
    let log = CallLog::default();
    let dispatcher = dispatcher(&log);

    let resolution = dispatcher.router().resolve("GET", "/blog/cat/tech").unwrap();
    assert_eq!(resolution.params().get("category"), Some("tech"));

    dispatcher
        .dispatch(&Request::get("/blog/cat/tech"), &mut false)
        .unwrap();
    assert_eq!(
        calls(&log),
        vec![("BlogController@category".to_string(), vec!["tech".to_string()])]
    );
}

#[test]
fn test_show_detail_positional_order() {
    let log = CallLog::default();
    let dispatcher = dispatcher(&log);

    let resolution = dispatcher
        .router()
        .resolve("GET", "/show/news/hello-world/42")
        .unwrap();
    let pairs: Vec<(&str, &str)> = resolution.params().iter().collect();
    assert_eq!(
        pairs,
        vec![("category", "news"), ("title", "hello-world"), ("id", "42")]
    );

    dispatcher
        .dispatch(&Request::get("/show/news/hello-world/42"), &mut false)
        .unwrap();
    assert_eq!(
        calls(&log),
        vec![(
            "ShowController@detail".to_string(),
            vec!["news".to_string(), "hello-world".to_string(), "42".to_string()]
        )]
    );
}

#[test]
fn test_literal_declared_first_wins() {
    let log = CallLog::default();
    let dispatcher = dispatcher(&log);

    let outcome = dispatcher
        .dispatch(&Request::get("/blog/show"), &mut false)
        .unwrap();
    assert_eq!(outcome, Outcome::Invoked(Response::text("BlogController@show")));
}

#[test]
fn test_auth_gate_never_invokes_handler() {
    let log = CallLog::default();
    let dispatcher = dispatcher(&log);

    for request in [
        Request::get("/dashboard"),
        Request::get("/dashboard?id=1"),
        Request::post("/dashboard/update"),
        Request::new("DELETE", "/dashboard/delete"),
    ] {
        let outcome = dispatcher.dispatch(&request, &mut false).unwrap();
        assert_eq!(outcome, Outcome::LoginRequired, "{}", request.uri);
    }
    assert!(calls(&log).is_empty());

    dispatcher
        .dispatch(&Request::get("/dashboard"), &mut true)
        .unwrap();
    assert_eq!(calls(&log).len(), 1);
}

#[test]
fn test_unknown_method_not_found() {
    let log = CallLog::default();
    let dispatcher = dispatcher(&log);

    let err = dispatcher
        .dispatch(&Request::new("PATCH", "/blog"), &mut true)
        .unwrap_err();
    assert_eq!(
        err,
        RouterError::RouteNotFound {
            method: "PATCH".to_string(),
            path: "/blog".to_string(),
        }
    );
    assert!(calls(&log).is_empty());
}

#[test]
fn test_not_found_beats_auth() {
    let log = CallLog::default();
    let dispatcher = dispatcher(&log);

    let err = dispatcher
        .dispatch(&Request::get("/dashboard/extra"), &mut false)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_handle_error_message() {
    let log = CallLog::default();
    let dispatcher = dispatcher(&log);

    let res = dispatcher.handle(&Request::get("/blog/cat/tech/more"), &mut false);
    assert_eq!(res.status, 404);
    assert_eq!(
        res.body_string(),
        Some("Error: Route not found: GET /blog/cat/tech/more".to_string())
    );
}

#[test]
fn test_matcher_literal_iff_equal() {
    let pattern = PathPattern::parse("/blog/cat/:category").unwrap();
    for (path, expected) in [
        ("/blog/cat/tech", true),
        ("/blog/cat/", true),
        ("/blog/dog/tech", false),
        ("/BLOG/cat/tech", false),
        ("blog/cat/tech", false),
        ("/blog/cat", false),
    ] {
        assert_eq!(pattern.match_path(path).is_some(), expected, "{path}");
    }
}
