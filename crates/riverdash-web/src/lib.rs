//! Axum surface of the dashboard: crawler ingestion endpoints, the region map
//! and its popovers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use askama::Template;
use axum::{
    body::Bytes,
    extract::{Path as AxumPath, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use riverdash_core::{Batch, BatchSummary, GaugePatch, GaugeRecord, RegionDisplayModel};
use riverdash_ingest::{GaugeReconciler, IngestConfig};
use riverdash_map::{
    build_region_models, format_level, format_ratio, CatalogError, CityCatalog, CityMap,
    FeedError, FileRiverLevelFeed, HttpRiverLevelFeed, Label, Language, PopoverAnchor, RatioBand,
    RiverLevelFeed, RiverLevelSnapshot, StaticRiverLevelFeed, Translations,
};
use riverdash_storage::StoreError;
use serde::Deserialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

pub const CRATE_NAME: &str = "riverdash-web";

/// Where the map reads its river levels from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelsSource {
    Url(String),
    File(PathBuf),
    Empty,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub port: u16,
    pub assets_dir: PathBuf,
    pub levels: LevelsSource,
    pub http_timeout_secs: u64,
    pub default_city: String,
    pub default_language: Language,
}

impl WebConfig {
    pub fn from_env() -> Self {
        let levels = match (
            std::env::var("RIVERDASH_LEVELS_URL").ok(),
            std::env::var("RIVERDASH_LEVELS_FILE").ok(),
        ) {
            (Some(url), _) if !url.trim().is_empty() => LevelsSource::Url(url),
            (_, Some(path)) if !path.trim().is_empty() => LevelsSource::File(PathBuf::from(path)),
            _ => LevelsSource::Empty,
        };
        Self {
            port: std::env::var("RIVERDASH_WEB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            assets_dir: std::env::var("RIVERDASH_ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./assets")),
            levels,
            http_timeout_secs: std::env::var("RIVERDASH_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            default_city: std::env::var("RIVERDASH_DEFAULT_CITY")
                .unwrap_or_else(|_| "seoul".to_string()),
            default_language: std::env::var("RIVERDASH_DEFAULT_LANG")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    pub fn river_level_feed(&self) -> Result<Arc<dyn RiverLevelFeed>, FeedError> {
        Ok(match &self.levels {
            LevelsSource::Url(url) => Arc::new(HttpRiverLevelFeed::new(
                url.clone(),
                Duration::from_secs(self.http_timeout_secs),
                concat!("riverdash/", env!("CARGO_PKG_VERSION")),
            )?),
            LevelsSource::File(path) => Arc::new(FileRiverLevelFeed::new(path.clone())),
            LevelsSource::Empty => Arc::new(StaticRiverLevelFeed::default()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<GaugeReconciler>,
    pub catalog: Arc<CityCatalog>,
    pub translations: Arc<Translations>,
    pub feed: Arc<dyn RiverLevelFeed>,
    pub assets_dir: PathBuf,
    pub default_city: String,
    pub default_language: Language,
}

impl AppState {
    /// Loads the city catalog and translations shipped under `assets_dir`.
    pub fn load(
        reconciler: Arc<GaugeReconciler>,
        feed: Arc<dyn RiverLevelFeed>,
        assets_dir: impl Into<PathBuf>,
    ) -> Result<Self, CatalogError> {
        let assets_dir = assets_dir.into();
        let catalog = CityCatalog::load(assets_dir.join("regions/cities.yaml"))?;
        let translations = Translations::load_dir(assets_dir.join("i18n"))?;
        Ok(Self {
            reconciler,
            catalog: Arc::new(catalog),
            translations: Arc::new(translations),
            feed,
            assets_dir,
            default_city: "seoul".to_string(),
            default_language: Language::Ko,
        })
    }

    pub fn with_defaults(mut self, city: impl Into<String>, language: Language) -> Self {
        self.default_city = city.into();
        self.default_language = language;
        self
    }

    fn language(&self, requested: Option<&str>) -> Language {
        requested
            .and_then(|code| code.parse().ok())
            .unwrap_or(self.default_language)
    }

    fn city(&self, city_id: &str) -> Result<&CityMap, ApiError> {
        self.catalog
            .city(city_id)
            .ok_or_else(|| ApiError::NotFound(format!("city {city_id}")))
    }

    // Pages still render when the feed is down; every region just shows no data.
    async fn snapshot_or_empty(&self) -> RiverLevelSnapshot {
        match self.feed.latest().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "river level feed unavailable; rendering without data");
                RiverLevelSnapshot::default()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("{0} not found")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Feed(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (
            status,
            Json(serde_json::json!({
                "status": "Error",
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize, Default)]
struct MapQuery {
    lang: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PopoverQuery {
    x: f64,
    y: f64,
    width: f64,
    lang: Option<String>,
}

#[derive(Debug, Clone)]
struct MapRegionView {
    name: String,
    label: String,
    path: String,
    label_x: f64,
    label_y: f64,
    band: &'static str,
}

#[derive(Debug, Clone)]
struct LegendEntry {
    css_class: &'static str,
    text: String,
}

#[derive(Template)]
#[template(path = "map.html")]
struct MapTemplate {
    lang: String,
    title: String,
    observed_at_label: String,
    observed_at: String,
    city_id: String,
    width: u32,
    height: u32,
    regions: Vec<MapRegionView>,
    legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone)]
struct PopoverRiverView {
    title: String,
    current_level: String,
    planned_flood_level: String,
    ratio: String,
}

#[derive(Template)]
#[template(path = "popover.html")]
struct PopoverTemplate {
    left: f64,
    top: f64,
    transform: &'static str,
    region_label: String,
    average_label: String,
    average_text: String,
    current_label: String,
    planned_label: String,
    ratio_label: String,
    rivers: Vec<PopoverRiverView>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/map/{city}", get(map_handler))
        .route("/map/{city}/regions/{region}/popover", get(popover_handler))
        .route("/api/regions/{city}", get(regions_api_handler))
        .route("/crawling/rivergauge", post(register_gauges_handler))
        .route("/crawling/rivergauge/update", post(update_gauges_handler))
        .route("/crawling/rivergauge/cache", delete(invalidate_cache_handler))
        .route("/crawling/riverlevel", post(ingest_readings_handler))
        .route("/assets/static/app.css", get(app_css_handler))
        .with_state(Arc::new(state))
}

pub async fn serve(config: WebConfig, reconciler: Arc<GaugeReconciler>) -> anyhow::Result<()> {
    let feed = config
        .river_level_feed()
        .context("building river level feed")?;
    let state = AppState::load(reconciler, feed, config.assets_dir.clone())
        .context("loading map assets")?
        .with_defaults(config.default_city.clone(), config.default_language);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("binding port {}", config.port))?;
    info!(port = config.port, "dashboard listening");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub async fn serve_from_env() -> anyhow::Result<()> {
    let store = IngestConfig::from_env().connect_store().await?;
    let reconciler = Arc::new(GaugeReconciler::new(Arc::new(store)));
    serve(WebConfig::from_env(), reconciler).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

async fn register_gauges_handler(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<Batch<GaugeRecord>>,
) -> Result<Json<BatchSummary>, ApiError> {
    Ok(Json(state.reconciler.register_batch(batch.data).await?))
}

async fn update_gauges_handler(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<Batch<GaugePatch>>,
) -> Result<Json<BatchSummary>, ApiError> {
    Ok(Json(state.reconciler.update_batch(batch.data).await?))
}

async fn invalidate_cache_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.reconciler.invalidate().await;
    StatusCode::NO_CONTENT
}

async fn ingest_readings_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Json<bool> {
    Json(state.reconciler.accept_readings(&body))
}

async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MapQuery>,
) -> Response {
    let city_id = state.default_city.clone();
    render_map(&state, &city_id, &query).await
}

async fn map_handler(
    State(state): State<Arc<AppState>>,
    AxumPath(city_id): AxumPath<String>,
    Query(query): Query<MapQuery>,
) -> Response {
    render_map(&state, &city_id, &query).await
}

async fn render_map(state: &AppState, city_id: &str, query: &MapQuery) -> Response {
    let city = match state.city(city_id) {
        Ok(city) => city,
        Err(err) => return err.into_response(),
    };
    let language = state.language(query.lang.as_deref());
    let t = &state.translations;
    let snapshot = state.snapshot_or_empty().await;
    let models = build_region_models(city, &snapshot);

    let regions = city
        .regions
        .iter()
        .zip(&models)
        .map(|(shape, model)| MapRegionView {
            name: shape.name.clone(),
            label: t.region_name(language, &shape.name),
            path: shape.path.clone(),
            label_x: shape.label_x,
            label_y: shape.label_y,
            band: RatioBand::for_ratio(model.average_ratio).css_class(),
        })
        .collect();
    let no_data = t.label(language, Label::NoData);
    let legend = RatioBand::ALL
        .into_iter()
        .map(|band| LegendEntry {
            css_class: band.css_class(),
            text: band.range_text().map(str::to_string).unwrap_or_else(|| no_data.clone()),
        })
        .collect();

    render_html(MapTemplate {
        lang: language.code().to_string(),
        title: t.label(language, Label::Title),
        observed_at_label: t.label(language, Label::ObservedAt),
        observed_at: snapshot
            .observed_at
            .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| no_data.clone()),
        city_id: city.city_id.clone(),
        width: city.width,
        height: city.height,
        regions,
        legend,
    })
}

async fn popover_handler(
    State(state): State<Arc<AppState>>,
    AxumPath((city_id, region)): AxumPath<(String, String)>,
    Query(query): Query<PopoverQuery>,
) -> Response {
    let city = match state.city(&city_id) {
        Ok(city) => city,
        Err(err) => return err.into_response(),
    };
    if city.region(&region).is_none() {
        return ApiError::NotFound(format!("region {region}")).into_response();
    }

    let language = state.language(query.lang.as_deref());
    let t = &state.translations;
    let snapshot = state.snapshot_or_empty().await;
    let Some(model) = build_region_models(city, &snapshot)
        .into_iter()
        .find(|m| m.name == region)
    else {
        return ApiError::NotFound(format!("region {region}")).into_response();
    };

    let no_data = t.label(language, Label::NoData);
    let rivers = model
        .rivers
        .iter()
        .map(|river| PopoverRiverView {
            title: format!(
                "{} - {}",
                t.river_name(language, &river.river_name),
                river.gauge_name
            ),
            current_level: format_level(river.current_level),
            planned_flood_level: format_level(river.planned_flood_level),
            ratio: format_ratio(river.ratio, &no_data),
        })
        .collect();

    render_html(PopoverTemplate {
        left: query.x,
        top: query.y,
        transform: PopoverAnchor::for_cursor(query.x, query.width).transform(),
        region_label: t.region_name(language, &model.name),
        average_label: t.label(language, Label::AverageRatio),
        average_text: format_ratio(model.average_ratio, &no_data),
        current_label: t.label(language, Label::CurrentLevel),
        planned_label: t.label(language, Label::PlannedFloodLevel),
        ratio_label: t.label(language, Label::LevelRatio),
        rivers,
    })
}

async fn regions_api_handler(
    State(state): State<Arc<AppState>>,
    AxumPath(city_id): AxumPath<String>,
) -> Result<Json<Vec<RegionDisplayModel>>, ApiError> {
    let city = state.city(&city_id)?;
    let snapshot = state.feed.latest().await?;
    Ok(Json(build_region_models(city, &snapshot)))
}

async fn app_css_handler(State(state): State<Arc<AppState>>) -> Response {
    let css_path = state.assets_dir.join("static/app.css");
    match tokio::fs::read_to_string(&css_path).await {
        Ok(css) => ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response(),
        Err(err) => {
            warn!(path = %css_path.display(), error = %err, "stylesheet missing");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn render_html<T: Template>(tpl: T) -> Response {
    match tpl.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => server_error(anyhow::anyhow!(err.to_string())),
    }
}

fn server_error(err: anyhow::Error) -> Response {
    error!(error = %err, "template rendering failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!("Server error: {}", err)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use riverdash_map::{RegionRiverLevels, RiverReading};
    use riverdash_storage::MemoryGaugeStore;
    use std::path::Path;
    use tower::ServiceExt;

    // 중구, percent-encoded for request URIs.
    const JUNG_GU: &str = "%EC%A4%91%EA%B5%AC";

    fn assets_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets")
            .canonicalize()
            .unwrap()
    }

    fn snapshot() -> RiverLevelSnapshot {
        RiverLevelSnapshot {
            observed_at: None,
            regions: vec![RegionRiverLevels {
                region: "중구".into(),
                rivers: vec![
                    RiverReading {
                        river_name: "청계천".into(),
                        gauge_name: "청계".into(),
                        current_level: 1.0,
                        planflood_level: 4.0,
                    },
                    RiverReading {
                        river_name: "한강".into(),
                        gauge_name: "한강대교".into(),
                        current_level: 3.0,
                        planflood_level: 4.0,
                    },
                ],
            }],
        }
    }

    fn station_a() -> GaugeRecord {
        GaugeRecord {
            station_code: "A1".into(),
            station_name: "Station A".into(),
            managing_org: "Org1".into(),
            flood_warning: false,
            address: None,
            longitude: None,
            latitude: None,
            ground_datum: None,
            planned_flood_level: None,
        }
    }

    fn test_app() -> (Arc<MemoryGaugeStore>, Router) {
        let store = Arc::new(MemoryGaugeStore::new());
        let reconciler = Arc::new(GaugeReconciler::new(store.clone()));
        let feed = Arc::new(StaticRiverLevelFeed::new(snapshot()));
        let state = AppState::load(reconciler, feed, assets_dir()).unwrap();
        (store, app(state))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        serde_json::from_str(&body_text(resp).await).unwrap()
    }

    #[tokio::test]
    async fn register_then_update_round_trip() {
        let (store, app) = test_app();

        let resp = app
            .clone()
            .oneshot(post_json(
                "/crawling/rivergauge",
                serde_json::json!({"data": [{
                    "obscd": "A1", "obsnm": "Station A", "mngorg": "Org1", "flood_warning": false
                }]}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"status": "Success", "requested": 1, "processed": 1})
        );

        let resp = app
            .oneshot(post_json(
                "/crawling/rivergauge/update",
                serde_json::json!({"data": [{
                    "obscd": "A1",
                    "obsnm": "Station A Renamed",
                    "mngorg": "Org1",
                    "flood_warning": false
                }]}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"status": "Success", "requested": 1, "processed": 1})
        );
        assert_eq!(store.rows().await[0].station_name, "Station A Renamed");
    }

    #[tokio::test]
    async fn register_rejects_records_missing_required_fields() {
        let (store, app) = test_app();
        let resp = app
            .oneshot(post_json(
                "/crawling/rivergauge",
                serde_json::json!({"data": [{"obscd": "A1"}]}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(store.rows().await.is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_a_generic_error() {
        let (store, app) = test_app();
        store.fail_writes(true);
        let resp = app
            .oneshot(post_json(
                "/crawling/rivergauge",
                serde_json::json!({"data": [{
                    "obscd": "A1", "obsnm": "Station A", "mngorg": "Org1", "flood_warning": false
                }]}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["status"], "Error");
    }

    #[tokio::test]
    async fn readings_endpoint_always_answers_true() {
        let (_store, app) = test_app();
        for body in [
            Body::empty(),
            Body::from(r#"{"data": []}"#),
            Body::from(r#"{"data": [{"obscd": "A1", "ymdhm": "202607151230", "wl": 1.2}]}"#),
        ] {
            let resp = app
                .clone()
                .oneshot(
                    axum::http::Request::builder()
                        .method("POST")
                        .uri("/crawling/riverlevel")
                        .body(body)
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(body_text(resp).await, "true");
        }
    }

    #[tokio::test]
    async fn index_renders_default_city_map() {
        let (_store, app) = test_app();
        let resp = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let text = body_text(resp).await;
        assert!(text.contains("서울시 하천 수위 현황"));
        assert!(text.contains("viewBox=\"0 0 800 529\""));
        assert!(text.contains("region watch"));
        assert_eq!(text.matches("<path").count(), 25);
    }

    #[tokio::test]
    async fn unknown_city_is_not_found() {
        let (_store, app) = test_app();
        let resp = app.oneshot(get_request("/map/atlantis")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn popover_anchors_left_of_cursor_in_right_half() {
        let (_store, app) = test_app();
        let resp = app
            .oneshot(get_request(&format!(
                "/map/seoul/regions/{JUNG_GU}/popover?x=600&y=120&width=800&lang=en"
            )))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let text = body_text(resp).await;
        assert!(text.contains("translate(calc(-100% - 15px), -50%)"));
        assert!(text.contains("left: 600px; top: 120px"));
        assert!(text.contains("Jung-gu"));
        assert!(text.contains("Cheonggyecheon - 청계"));
        assert!(text.contains("50.00 %"));
        assert!(text.contains("25.00 %"));
    }

    #[tokio::test]
    async fn popover_without_data_shows_no_data_label() {
        let (_store, app) = test_app();
        let resp = app
            .oneshot(get_request(
                "/map/seoul/regions/%EA%B0%95%EB%8F%99%EA%B5%AC/popover?x=10&y=10&width=800",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let text = body_text(resp).await;
        assert!(text.contains("translate(15px, -50%)"));
        assert!(text.contains("데이터 없음"));
    }

    #[tokio::test]
    async fn regions_api_returns_display_models() {
        let (_store, app) = test_app();
        let resp = app.oneshot(get_request("/api/regions/seoul")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let regions = body_json(resp).await;
        let regions = regions.as_array().unwrap();
        assert_eq!(regions.len(), 25);
        let jung = regions.iter().find(|r| r["guName"] == "중구").unwrap();
        assert_eq!(jung["averageRiverLevelRatio"], 0.5);
        assert_eq!(jung["riverLevel"][0]["riverLevelRatio"], 0.25);
    }

    #[tokio::test]
    async fn cache_reset_makes_external_edits_visible() {
        let (store, app) = test_app();
        store.put(station_a()).await;
        let rename = serde_json::json!({"data": [{"obscd": "A1", "obsnm": "Renamed"}]});
        let resp = app
            .clone()
            .oneshot(post_json("/crawling/rivergauge/update", rename.clone()))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["processed"], 1);

        // Another writer restores the old name behind the cache.
        store.put(station_a()).await;
        let resp = app
            .clone()
            .oneshot(post_json("/crawling/rivergauge/update", rename.clone()))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["processed"], 0);

        let resp = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .method("DELETE")
                    .uri("/crawling/rivergauge/cache")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app
            .oneshot(post_json("/crawling/rivergauge/update", rename))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["processed"], 1);
        assert_eq!(store.rows().await[0].station_name, "Renamed");
    }

    #[tokio::test]
    async fn stylesheet_is_served() {
        let (_store, app) = test_app();
        let resp = app.oneshot(get_request("/assets/static/app.css")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE].to_str().unwrap(),
            "text/css; charset=utf-8"
        );
    }
}
