//! FibLab HTTP Server
//!
//! JSON API over the FibLab measurement pipeline, meant to feed a chart
//! front-end.
//!
//! # Endpoints
//!
//! - `GET /fib/{n}?algo=[recursive|dp|iterative|matrix]`
//!   - Returns `{ n, algorithm, result }`. Defaults to `iterative`.
//! - `GET /analysis?max_n=&cutoff=`
//!   - Runs (or reuses) a sweep and returns its statistics and failures.
//! - `GET /series?max_n=&cutoff=&metric=[time|memory]`
//!   - Same sweep, reshaped into time and memory series keyed by `n`, or only
//!     the rows of `metric` when given.
//! - `GET /cache/stats`
//!   - Returns JSON statistics about the sweep cache (hits, misses, ratio).
//!
//! # Caching
//!
//! A sweep takes seconds, and a chart toggling between time and memory asks
//! for the same one repeatedly. Finished sweeps are kept in an LRU cache keyed
//! by `(max_n, cutoff)`. Sweeps run one at a time: the allocation counters
//! they read are process-wide.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use clap::Parser;
use fiblab_core::config::defaults;
use fiblab_core::{
    run_analysis, Algorithm, AnalysisConfig, AnalysisReport, ChartSeries, FibError, Metric,
};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};
use tracing_subscriber::EnvFilter;

/// Default number of cached sweeps.
const DEFAULT_CACHE_SIZE: usize = 32;

/// Command-line arguments for the server.
#[derive(Parser)]
#[command(name = "fiblab-server", version, about = "FibLab HTTP API Server")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// LRU cache size (number of sweeps to cache).
    #[arg(long, default_value_t = DEFAULT_CACHE_SIZE)]
    cache_size: usize,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Query parameters for the /fib endpoint.
#[derive(Clone, Copy, Deserialize)]
struct FibParams {
    /// Algorithm to use for calculation (default: iterative).
    #[serde(default)]
    algo: Algorithm,
}

/// Query parameters for the sweep endpoints.
#[derive(Clone, Copy, Deserialize)]
struct SweepParams {
    max_n: Option<u64>,
    cutoff: Option<u64>,
}

/// Query parameters for the /series endpoint.
#[derive(Clone, Copy, Deserialize)]
struct SeriesParams {
    max_n: Option<u64>,
    cutoff: Option<u64>,
    metric: Option<Metric>,
}

impl SeriesParams {
    fn sweep(self) -> SweepParams {
        SweepParams {
            max_n: self.max_n,
            cutoff: self.cutoff,
        }
    }
}

impl SweepParams {
    fn config(self) -> AnalysisConfig {
        AnalysisConfig::new(
            self.max_n.unwrap_or(defaults::MAX_N),
            self.cutoff.unwrap_or(defaults::RECURSIVE_CUTOFF),
        )
    }
}

#[derive(Serialize)]
struct FibResponse {
    n: i64,
    algorithm: Algorithm,
    result: u64,
}

/// Error responses carry `{ "error": message }`.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<FibError> for ApiError {
    fn from(err: FibError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

fn internal_error(err: impl std::fmt::Display) -> ApiError {
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: format!("internal error: {}", err),
    }
}

/// A finished sweep, in both shapes the API serves.
struct CachedSweep {
    report: AnalysisReport,
    series: ChartSeries,
}

/// Cache key: `(max_n, recursive_cutoff)`
type CacheKey = (u64, u64);

/// Shared application state.
///
/// Contains resources shared across all request handlers.
#[derive(Clone)]
struct AppState {
    /// Protected by a Mutex because `LruCache` is not thread-safe.
    cache: Arc<Mutex<LruCache<CacheKey, Arc<CachedSweep>>>>,
    /// Held for the whole duration of a sweep.
    sweep_lock: Arc<tokio::sync::Mutex<()>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl AppState {
    /// A panicking handler cannot leave the cache half-updated, so a poisoned
    /// lock is still usable.
    fn cache(&self) -> MutexGuard<'_, LruCache<CacheKey, Arc<CachedSweep>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached(&self, key: &CacheKey) -> Option<Arc<CachedSweep>> {
        let cached = self.cache().get(key).cloned();
        if cached.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(max_n = key.0, cutoff = key.1, "sweep cache hit");
        }
        cached
    }

    /// Returns the cached sweep for `config`, running it on a blocking thread
    /// on a miss.
    ///
    /// Concurrent misses for the same key wait on the sweep lock and are then
    /// served from the cache.
    async fn sweep(&self, config: AnalysisConfig) -> Result<Arc<CachedSweep>, ApiError> {
        config.validate()?;
        let key = (config.max_n, config.recursive_cutoff);

        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }
        let _running = self.sweep_lock.lock().await;
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let results = tokio::task::spawn_blocking(move || run_analysis(&config))
            .await
            .map_err(internal_error)??;
        let sweep = Arc::new(CachedSweep {
            report: AnalysisReport::from_results(&results),
            series: ChartSeries::from_results(&results),
        });

        self.cache().put(key, sweep.clone());
        Ok(sweep)
    }
}

/// Handler for getting a Fibonacci number.
///
/// Route: `GET /fib/{n}?algo=[recursive|dp|iterative|matrix]`
async fn get_fib(
    Path(n): Path<i64>,
    Query(params): Query<FibParams>,
) -> Result<Json<FibResponse>, ApiError> {
    let algorithm = params.algo;
    // The recursive algorithm can take tens of seconds near its limit.
    let result = tokio::task::spawn_blocking(move || algorithm.compute(n))
        .await
        .map_err(internal_error)??;
    Ok(Json(FibResponse {
        n,
        algorithm,
        result,
    }))
}

/// Handler for sweep statistics.
///
/// Route: `GET /analysis?max_n=&cutoff=`
async fn get_analysis(
    State(state): State<AppState>,
    Query(params): Query<SweepParams>,
) -> Result<Response, ApiError> {
    let sweep = state.sweep(params.config()).await?;
    Ok(Json(&sweep.report).into_response())
}

/// Handler for chart series.
///
/// Route: `GET /series?max_n=&cutoff=&metric=[time|memory]`
async fn get_series(
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> Result<Response, ApiError> {
    let sweep = state.sweep(params.sweep().config()).await?;
    Ok(match params.metric {
        Some(metric) => Json(sweep.series.rows(metric)).into_response(),
        None => Json(&sweep.series).into_response(),
    })
}

/// Statistics about cache usage.
#[derive(Serialize)]
struct CacheStats {
    hits: u64,
    misses: u64,
    hit_ratio: f64,
    cached_entries: usize,
    cache_capacity: usize,
}

/// Handler for cache statistics.
///
/// Route: `GET /cache/stats`
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    let hits = state.hits.load(Ordering::Relaxed);
    let misses = state.misses.load(Ordering::Relaxed);
    let total = hits + misses;
    let hit_ratio = if total > 0 {
        hits as f64 / total as f64
    } else {
        0.0
    };

    let cache = state.cache();

    Json(CacheStats {
        hits,
        misses,
        hit_ratio,
        cached_entries: cache.len(),
        cache_capacity: cache.cap().into(),
    })
}

/// Handler for the root path.
///
/// Route: `GET /`
async fn root() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

/// Creates the Axum router with all routes configured.
///
/// This function is separated from `main` to enable integration testing
/// without requiring a live server.
///
/// # Arguments
/// * `cache_size` - Maximum number of sweeps in the LRU cache (0 falls back
///   to the default).
pub fn create_app(cache_size: usize) -> Router {
    let cache_size = NonZeroUsize::new(cache_size)
        .or(NonZeroUsize::new(DEFAULT_CACHE_SIZE))
        .unwrap_or(NonZeroUsize::MIN);
    let state = AppState {
        cache: Arc::new(Mutex::new(LruCache::new(cache_size))),
        sweep_lock: Arc::new(tokio::sync::Mutex::new(())),
        hits: Arc::new(AtomicU64::new(0)),
        misses: Arc::new(AtomicU64::new(0)),
    };

    Router::new()
        .route("/", get(root))
        .route("/fib/{n}", get(get_fib))
        .route("/analysis", get(get_analysis))
        .route("/series", get(get_series))
        .route("/cache/stats", get(cache_stats))
        .with_state(state)
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "fiblab_server=debug,fiblab_core=debug"
    } else {
        "fiblab_server=info,fiblab_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Main server entry point.
///
/// Parses CLI arguments, initializes logging, and starts the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        cache_size = args.cache_size,
        "starting FibLab server"
    );

    let app = create_app(args.cache_size);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", args.port, e))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
