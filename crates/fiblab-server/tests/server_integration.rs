//! Integration tests for the FibLab HTTP Server.
//!
//! These tests verify the API endpoints by making HTTP requests
//! to the server without starting a live network listener.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fiblab_server::create_app;

/// Helper to create a test app with a small cache.
fn test_app() -> Router {
    create_app(4)
}

/// Sends a GET request and returns the status and the body parsed as JSON.
async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

// ============================================================================
// Root Page
// ============================================================================

#[tokio::test]
async fn get_root_returns_html() {
    let app = test_app();

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/html; charset=utf-8"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8(body.to_vec()).unwrap();
    assert!(body_str.contains("FibLab API"));
}

// ============================================================================
// Fibonacci Endpoint Tests
// ============================================================================

#[tokio::test]
async fn get_fib_defaults_to_iterative() {
    let app = test_app();
    let (status, body) = get_json(&app, "/fib/10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["n"], 10);
    assert_eq!(body["algorithm"], "iterative");
    assert_eq!(body["result"], 55);
}

#[tokio::test]
async fn get_fib_each_algorithm() {
    let app = test_app();
    for algo in ["recursive", "dp", "iterative", "matrix"] {
        let (status, body) = get_json(&app, &format!("/fib/20?algo={}", algo)).await;
        assert_eq!(status, StatusCode::OK, "{}", algo);
        assert_eq!(body["algorithm"], algo);
        assert_eq!(body["result"], 6765, "{}", algo);
    }
}

#[tokio::test]
async fn get_fib_largest_u64_value() {
    let app = test_app();
    let (status, body) = get_json(&app, "/fib/93?algo=matrix").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"].as_u64(), Some(12_200_160_415_121_876_738));
}

#[tokio::test]
async fn get_fib_negative_is_bad_request() {
    let app = test_app();
    let (status, body) = get_json(&app, "/fib/-3?algo=dp").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid argument"));
}

#[tokio::test]
async fn get_fib_overflow_is_bad_request() {
    let app = test_app();
    let (status, body) = get_json(&app, "/fib/94").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("overflow"));
}

#[tokio::test]
async fn get_fib_recursive_limit_is_bad_request() {
    let app = test_app();
    let (status, body) = get_json(&app, "/fib/70?algo=recursive").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("resource exhausted"));
}

#[tokio::test]
async fn get_fib_unknown_algorithm_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::get("/fib/10?algo=fft")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Analysis and Series Endpoint Tests
// ============================================================================

#[tokio::test]
async fn analysis_returns_statistics_per_algorithm() {
    let app = test_app();
    let (status, body) = get_json(&app, "/analysis?max_n=12&cutoff=8").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"]["max_n"], 12);
    assert_eq!(body["config"]["recursive_cutoff"], 8);
    for name in ["recursive", "dp", "iterative", "matrix"] {
        let stats = &body["statistics"][name];
        for metric in ["time", "memory"] {
            for field in ["mean", "median", "std", "min", "max"] {
                assert!(
                    stats[metric][field].is_number(),
                    "{}.{}.{} missing",
                    name,
                    metric,
                    field
                );
            }
        }
    }
    assert_eq!(body["failures"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn analysis_lists_failures() {
    let app = test_app();
    let (status, body) = get_json(&app, "/analysis?max_n=94&cutoff=3").await;

    assert_eq!(status, StatusCode::OK);
    let failures = body["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 3);
    assert_eq!(failures[0]["n"], 94);
    assert_eq!(failures[0]["algorithm"], "dp");
    assert!(failures[0]["error"].as_str().unwrap().contains("overflow"));
}

#[tokio::test]
async fn analysis_rejects_invalid_config() {
    let app = test_app();

    let (status, body) = get_json(&app, "/analysis?max_n=5000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("invalid configuration"));

    let (status, _) = get_json(&app, "/series?max_n=10&cutoff=99").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn series_rows_are_keyed_by_n() {
    let app = test_app();
    let (status, body) = get_json(&app, "/series?max_n=9&cutoff=5").await;

    assert_eq!(status, StatusCode::OK);
    for metric in ["time", "memory"] {
        let rows = body[metric].as_array().unwrap();
        assert_eq!(rows.len(), 10);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row["n"], i as u64);
            assert_eq!(row["recursive"].is_null(), i > 5, "{} row {}", metric, i);
            assert!(row["dp"].is_number());
            assert!(row["iterative"].is_number());
            assert!(row["matrix"].is_number());
        }
    }
}

#[tokio::test]
async fn series_metric_selects_one_series() {
    let app = test_app();
    let (status, body) = get_json(&app, "/series?max_n=6&cutoff=3&metric=memory").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert!(rows[3]["recursive"].is_number());
    assert!(rows[4]["recursive"].is_null());

    let (status, _) = get_json(&app, "/series?max_n=6&metric=speed").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Cache Statistics Endpoint Tests
// ============================================================================

#[tokio::test]
async fn cache_stats_start_empty() {
    let app = test_app();
    let (status, body) = get_json(&app, "/cache/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hits"], 0);
    assert_eq!(body["misses"], 0);
    assert_eq!(body["hit_ratio"], 0.0);
    assert_eq!(body["cached_entries"], 0);
    assert_eq!(body["cache_capacity"], 4);
}

#[tokio::test]
async fn sweeps_are_cached_across_endpoints() {
    let app = test_app();

    let (status, _) = get_json(&app, "/analysis?max_n=10&cutoff=10").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(&app, "/series?max_n=10&cutoff=10").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(&app, "/series?max_n=11&cutoff=10").await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = get_json(&app, "/cache/stats").await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 2);
    assert_eq!(stats["cached_entries"], 2);
    assert!((stats["hit_ratio"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn zero_cache_size_falls_back_to_default() {
    let app = create_app(0);
    let (_, stats) = get_json(&app, "/cache/stats").await;
    assert_eq!(stats["cache_capacity"], 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_sweeps_run_once() {
    let app = test_app();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { get_json(&app, "/analysis?max_n=25&cutoff=25").await })
        })
        .collect();
    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let (_, stats) = get_json(&app, "/cache/stats").await;
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["hits"], 3);
    assert_eq!(stats["cached_entries"], 1);
}
