//! HTTP round trips through the axum host.

use std::time::Duration;

use axum::http::{Method, StatusCode};

use switchyard::config::{AppConfig, DispatchOptions};
use switchyard::dispatch::{Dispatcher, DispatcherHandle, RouteRegistrar, RouterBuilder};
use switchyard::middleware::{RequestIdMiddleware, X_REQUEST_ID};
use switchyard::pipeline::RequestContext;
use switchyard::routing::Params;
use switchyard::Shutdown;

mod common;

fn versioned(tag: &'static str) -> Dispatcher {
    let mut builder = RouterBuilder::with_options(DispatchOptions {
        auto_options: true,
        ..DispatchOptions::default()
    });
    builder.layer(RequestIdMiddleware);
    builder
        .get("/version", move |_: RequestContext, _: Params| async move { tag })
        .unwrap();
    builder
        .get(r"/users/:id(\d+)", |_: RequestContext, params: Params| async move {
            format!("user {}", params.get("id").unwrap_or_default())
        })
        .unwrap();
    builder
        .post("/slow", |_: RequestContext, _: Params| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        })
        .unwrap();
    builder.build()
}

#[tokio::test]
async fn test_serves_dispatch_outcomes() {
    let shutdown = Shutdown::new();
    let addr = common::start_server(
        &AppConfig::default(),
        DispatcherHandle::new(versioned("v1")),
        &shutdown,
    )
    .await;
    let client = common::client();

    let res = client.get(format!("http://{addr}/users/42")).send().await.expect("Server unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key(X_REQUEST_ID.as_str()));
    assert_eq!(res.text().await.unwrap(), "user 42");

    let res = client.get(format!("http://{addr}/users/abc")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let res = client.delete(format!("http://{addr}/version")).send().await.unwrap();
    assert_eq!(res.status(), 405);
    assert_eq!(res.headers()["allow"], "GET");

    let res = client
        .request(Method::OPTIONS, format!("http://{addr}/version"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["allow"], "GET");

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_timeout_applies() {
    let mut config = AppConfig::default();
    config.server.request_timeout_secs = 1;

    let shutdown = Shutdown::new();
    let addr = common::start_server(&config, DispatcherHandle::new(versioned("v1")), &shutdown).await;

    let res = common::client()
        .post(format!("http://{addr}/slow"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT.as_u16());

    shutdown.trigger();
}

#[tokio::test]
async fn test_table_swap_while_serving() {
    let handle = DispatcherHandle::new(versioned("v1"));
    let shutdown = Shutdown::new();
    let addr = common::start_server(&AppConfig::default(), handle.clone(), &shutdown).await;
    let client = common::client();
    let url = format!("http://{addr}/version");

    assert_eq!(client.get(&url).send().await.unwrap().text().await.unwrap(), "v1");

    let previous = handle.replace(versioned("v2"));
    assert_eq!(previous.table().len(), 3);

    assert_eq!(client.get(&url).send().await.unwrap().text().await.unwrap(), "v2");

    shutdown.trigger();
}
