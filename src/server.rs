//! HTTP surface: server-rendered pages plus a small JSON API.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::affordability::{self, AffordabilityResult};
use crate::calculator::{Calculator, CalculatorInit};
use crate::dataset::RentData;
use crate::geo::{self, StateSummary};
use crate::pages::{self, PageMeta};
use crate::types::{CityListing, LocationRecord, ZipEntry};
use crate::zipcode::{self, KnownPlace, ZipLookup};

/// Application state shared across all requests
#[derive(Clone)]
struct AppState {
    data: Arc<RentData>,
    metrics: Arc<Metrics>,
}

/// Server metrics
struct Metrics {
    total_requests: AtomicU64,
    requests_in_flight: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    /// Count a request; it stays in flight until the guard drops
    fn track(&self) -> RequestGuard<'_> {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.requests_in_flight.fetch_add(1, Ordering::Relaxed);
        RequestGuard(&self.requests_in_flight)
    }
}

/// RAII guard for tracking in-flight requests
struct RequestGuard<'a>(&'a AtomicU64);

impl<'a> Drop for RequestGuard<'a> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Build the Axum application with routes and middleware
pub fn build_app(data: Arc<RentData>) -> Router {
    let metrics = Arc::new(Metrics {
        total_requests: AtomicU64::new(0),
        requests_in_flight: AtomicU64::new(0),
        start_time: Instant::now(),
    });

    let state = AppState { data, metrics };

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .route("/api/zip/:zip", get(zip_lookup))
        .route("/api/affordability", get(affordability_check))
        .route("/api/states", get(list_states))
        .route("/api/states/:state", get(list_cities))
        .route("/api/metrics", get(get_metrics))
        // Raw zip index for client-side autofill
        .route("/data/zip_index.json", get(zip_index_asset))
        // Pages
        .route("/", get(home_page))
        .route("/:state", get(state_page))
        .route("/:state/:city", get(city_page))
        .fallback(page_not_found)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Calculator inputs submitted through the page form
#[derive(Debug, Default, Deserialize)]
struct CalculatorQuery {
    #[serde(default)]
    zip: Option<String>,
    #[serde(default)]
    salary: Option<String>,
}

/// National calculator
async fn home_page(
    State(state): State<AppState>,
    Query(query): Query<CalculatorQuery>,
) -> Html<String> {
    let _guard = state.metrics.track();

    let mut calc = Calculator::new(CalculatorInit::default());
    if let Some(zip) = &query.zip {
        calc.set_zip(state.data.zip_index(), zip);
    }
    if let Some(salary) = &query.salary {
        calc.set_salary(salary);
    }

    Html(pages::home(&calc.view()))
}

/// Every city of one state
async fn state_page(State(state): State<AppState>, Path(state_slug): Path<String>) -> Response {
    let _guard = state.metrics.track();

    let slug = geo::sanitize_slug(&state_slug);
    match state.data.state(&slug) {
        Some(index) => Html(pages::state(&slug, &index.sorted_cities())).into_response(),
        None => {
            tracing::debug!("No data for state {}", slug);
            not_found_html(&PageMeta::not_found(), "We have no rent data for that state.")
        }
    }
}

/// One city, with the calculator pre-filled from its record
async fn city_page(
    State(state): State<AppState>,
    Path((state_slug, city_slug)): Path<(String, String)>,
    Query(query): Query<CalculatorQuery>,
) -> Response {
    let _guard = state.metrics.track();

    let slug = geo::sanitize_slug(&state_slug);
    let Some(city) = state.data.city(&slug, &city_slug) else {
        tracing::debug!("No data for {}/{}", slug, city_slug);
        return not_found_html(&PageMeta::city_not_found(), "We have no rent data for that city.");
    };

    let mut calc = Calculator::new(CalculatorInit {
        zip: Some(city.zip.clone()),
        rent: Some(city.rent),
        name: Some(city.city.clone()),
    });
    // Only a zip different from the city's own re-resolves the location.
    if let Some(zip) = &query.zip
        && zipcode::normalize_zip_input(zip) != city.zip
    {
        calc.set_zip(state.data.zip_index(), zip);
    }
    if let Some(salary) = &query.salary {
        calc.set_salary(salary);
    }

    Html(pages::city(&slug, &city_slug, city, &calc.view())).into_response()
}

async fn page_not_found(State(state): State<AppState>) -> Response {
    let _guard = state.metrics.track();
    not_found_html(&PageMeta::not_found(), "That page does not exist.")
}

fn not_found_html(meta: &PageMeta, message: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(pages::not_found(meta, message))).into_response()
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Resolve a zip code
async fn zip_lookup(
    State(state): State<AppState>,
    Path(zip): Path<String>,
) -> Result<Json<ZipResponse>, ApiError> {
    let _guard = state.metrics.track();

    match zipcode::lookup(state.data.zip_index(), &zip) {
        ZipLookup::Found(record) => Ok(Json(ZipResponse {
            success: true,
            data: record,
        })),
        ZipLookup::NotFound => {
            let zip = zipcode::normalize_zip_input(&zip);
            tracing::debug!("Zip {} has no rent data", zip);
            Err(ApiError::ZipNotFound(zipcode::known_place(zip)))
        }
        ZipLookup::NotReady => Err(ApiError::Unavailable(
            "Zip index is not loaded".to_string(),
        )),
        ZipLookup::Empty | ZipLookup::Incomplete => Err(ApiError::BadRequest(
            "zip must be 5 digits".to_string(),
        )),
    }
}

#[derive(Serialize)]
struct ZipResponse {
    success: bool,
    data: LocationRecord,
}

#[derive(Debug, Deserialize)]
struct AffordabilityQuery {
    #[serde(default)]
    salary: Option<String>,
    #[serde(default)]
    rent: Option<String>,
    #[serde(default)]
    zip: Option<String>,
}

/// Evaluate a salary against an explicit rent or a zip's rent
async fn affordability_check(
    State(state): State<AppState>,
    Query(query): Query<AffordabilityQuery>,
) -> Result<Json<AffordabilityResponse>, ApiError> {
    let _guard = state.metrics.track();

    let incomplete = || ApiError::BadRequest("Enter details to calculate".to_string());

    // An explicit rent wins over the zip, and then no location is reported.
    let (rent, location) = match query.rent.as_deref() {
        Some(raw) => (Some(affordability::parse_rent(raw).ok_or_else(incomplete)?), None),
        None => {
            let location = query.zip.as_deref().and_then(|zip| {
                match zipcode::lookup(state.data.zip_index(), zip) {
                    ZipLookup::Found(record) => Some(record),
                    _ => None,
                }
            });
            (location.as_ref().map(|l| l.rent), location)
        }
    };
    let salary = query.salary.as_deref().and_then(affordability::parse_salary);

    let (Some(annual_salary), Some(monthly_rent)) = (salary, rent) else {
        return Err(incomplete());
    };
    let result = affordability::evaluate(Some(annual_salary), Some(monthly_rent))
        .ok_or_else(incomplete)?;

    Ok(Json(AffordabilityResponse {
        success: true,
        data: AffordabilityData {
            annual_salary,
            monthly_rent,
            location,
            percent_display: result.percent_display(),
            result,
        },
    }))
}

#[derive(Serialize)]
struct AffordabilityResponse {
    success: bool,
    data: AffordabilityData,
}

#[derive(Serialize)]
struct AffordabilityData {
    annual_salary: f64,
    monthly_rent: u32,
    location: Option<LocationRecord>,
    result: AffordabilityResult,
    percent_display: String,
}

async fn list_states(State(state): State<AppState>) -> Json<StatesResponse> {
    let _guard = state.metrics.track();
    Json(StatesResponse {
        success: true,
        data: state.data.state_summaries(),
    })
}

#[derive(Serialize)]
struct StatesResponse {
    success: bool,
    data: Vec<StateSummary>,
}

async fn list_cities(
    State(state): State<AppState>,
    Path(state_slug): Path<String>,
) -> Result<Json<CitiesResponse>, ApiError> {
    let _guard = state.metrics.track();

    let index = state
        .data
        .state(&state_slug)
        .ok_or_else(|| ApiError::NotFound("No rent data for this state".to_string()))?;

    Ok(Json(CitiesResponse {
        success: true,
        state: index.slug().to_string(),
        data: index.sorted_cities(),
    }))
}

#[derive(Serialize)]
struct CitiesResponse {
    success: bool,
    state: String,
    data: Vec<CityListing>,
}

/// The loaded zip index in its compact wire format
async fn zip_index_asset(
    State(state): State<AppState>,
) -> Result<Json<std::collections::HashMap<String, ZipEntry>>, ApiError> {
    let _guard = state.metrics.track();
    let index = state
        .data
        .zip_index()
        .ok_or_else(|| ApiError::Unavailable("Zip index is not loaded".to_string()))?;
    Ok(Json(index.entries().clone()))
}

/// Get server metrics
async fn get_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        total_requests: state.metrics.total_requests.load(Ordering::Relaxed),
        requests_in_flight: state.metrics.requests_in_flight.load(Ordering::Relaxed),
        uptime_seconds: state.metrics.start_time.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
struct MetricsResponse {
    total_requests: u64,
    requests_in_flight: u64,
    uptime_seconds: u64,
}

/// API error types
enum ApiError {
    BadRequest(String),
    NotFound(String),
    ZipNotFound(Option<KnownPlace>),
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, known_place) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::ZipNotFound(place) => (
                StatusCode::NOT_FOUND,
                "LOCATION NOT FOUND".to_string(),
                place,
            ),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg, None),
        };

        let mut body = serde_json::json!({
            "success": false,
            "error": message
        });
        if let Some(place) = known_place {
            body["known_place"] = serde_json::json!(place);
        }

        (status, Json(body)).into_response()
    }
}
