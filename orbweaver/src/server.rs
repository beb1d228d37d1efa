use anyhow::Result;
use axum::{
    Json, Router,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, header},
    middleware::{self, Next},
    response::{Html, Response},
    routing::get,
};
use chrono::{Duration, Utc};
use orbweaver_core::graph::{self, NetworkGraph, WebGraph};
use orbweaver_core::registry::VisitorRegistry;
use orbweaver_core::visitor::{CenterNode, VisitorRecord};
use orbweaver_detect::profile::{
    Architecture, BrowserInfo, DeviceInfo, DeviceType, NetworkInfo, NetworkType, OsInfo,
    ProfileSummary, ThreatLevel,
};
use orbweaver_detect::{ClientDetector, ClientProfile};
use rand::Rng;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

const INDEX_PAGE: &str = include_str!("../assets/index.html");
const SESSION_COOKIE: &str = "visitor_id";

/// Shared state for the tracking server. The registry is behind a
/// blocking mutex; handlers hold it only for short synchronous sections
/// and never across an await point.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<StdMutex<VisitorRegistry>>,
    detector: Arc<ClientDetector>,
    ttl: Duration,
}

impl AppState {
    pub fn new(ttl: Duration) -> Self {
        Self {
            registry: Arc::new(StdMutex::new(VisitorRegistry::new())),
            detector: Arc::new(ClientDetector::new()),
            ttl,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/network", get(api_network))
        .route("/api/spiderweb", get(api_spiderweb))
        .route("/api/add_spider", get(api_add_spider))
        .layer(middleware::from_fn_with_state(state.clone(), track_visitor))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(bind: &str, port: u16, ttl_minutes: i64) -> Result<()> {
    let state = AppState::new(Duration::minutes(ttl_minutes));
    let app = router(state);

    let addr = format!("{}:{}", bind, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on http://{}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

/// Runs on every route: resolves the session cookie (issuing a fresh id
/// when absent) and folds the request into the registry. Classification
/// only happens for sessions the registry has not seen.
async fn track_visitor(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let (session_id, is_new) = match session_cookie(request.headers()) {
        Some(id) => (id, false),
        None => (VisitorRegistry::issue_session_id(), true),
    };

    let headers = lowercase_headers(request.headers());
    let user_agent = headers.get("user-agent").cloned().unwrap_or_default();
    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    {
        let mut registry = state.registry.lock().unwrap();
        let mut rng = rand::thread_rng();
        registry.upsert(
            &session_id,
            Utc::now(),
            || state.detector.analyze(&user_agent, &ip, &headers),
            &mut rng,
        );
    }

    let mut response = next.run(request).await;
    if is_new
        && let Ok(cookie) =
            header::HeaderValue::from_str(&format!("{}={}; Path=/", SESSION_COOKIE, session_id))
    {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Lower-cased header map, the shape the network detector expects
fn lowercase_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_lowercase(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Star topology snapshot. Pruning happens here, so a quiet registry
/// shrinks the next time someone looks at it.
async fn api_network(State(state): State<AppState>) -> Json<NetworkGraph> {
    let graph = {
        let mut registry = state.registry.lock().unwrap();
        registry.prune_expired(Utc::now(), state.ttl);
        graph::build(&CenterNode::website(), &registry.all())
    };
    Json(graph)
}

/// Mesh topology snapshot. This endpoint never prunes, so synthetic
/// spiders accumulate until a `/api/network` call sweeps them out.
async fn api_spiderweb(State(state): State<AppState>) -> Json<WebGraph> {
    let graph = {
        let registry = state.registry.lock().unwrap();
        let mut rng = rand::thread_rng();
        graph::build_web(
            &CenterNode::queen_spider(),
            &registry.all(),
            Utc::now(),
            &mut rng,
        )
    };
    Json(graph)
}

/// Insert a synthetic visitor with a canned desktop-Chrome profile
async fn api_add_spider(State(state): State<AppState>) -> Json<serde_json::Value> {
    let spider_id = VisitorRegistry::issue_session_id();

    {
        let mut registry = state.registry.lock().unwrap();
        let mut rng = rand::thread_rng();
        let mut record =
            VisitorRecord::new(spider_id.clone(), spider_profile(), Utc::now(), &mut rng);
        record.name = format!("Spider_{}", &spider_id[..6]);
        record.engagement_score = rng.gen_range(10..=50) as f64;
        registry.insert(record);
    }

    info!(spider = %&spider_id[..8], "synthetic spider added");
    Json(serde_json::json!({ "status": "spider_added", "spider_id": spider_id }))
}

fn spider_profile() -> ClientProfile {
    let user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                      (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
    ClientProfile {
        browser: BrowserInfo {
            name: "Google Chrome".to_string(),
            version: "119.0.0.0".to_string(),
            engine: "Blink".to_string(),
        },
        operating_system: OsInfo {
            name: "Windows 10/11".to_string(),
            version: "10".to_string(),
            architecture: Architecture::SixtyFourBit,
        },
        device: DeviceInfo {
            device_type: DeviceType::Desktop,
            brand: "Unknown".to_string(),
            model: "Unknown".to_string(),
            is_mobile: false,
            is_tablet: false,
        },
        network: NetworkInfo {
            ip_address: "192.168.1.100".to_string(),
            network_type: NetworkType::VpnLocal,
            is_proxy: false,
            is_vpn: true,
            country: "Local Network".to_string(),
            threat_level: ThreatLevel::Low,
        },
        user_agent: user_agent.to_string(),
        summary: ProfileSummary {
            browser_full: "Google Chrome 119.0.0.0".to_string(),
            os_full: "Windows 10/11 10".to_string(),
            device_full: "Unknown Unknown (Desktop)".to_string(),
            network_type: NetworkType::VpnLocal,
            threat_level: ThreatLevel::Low,
        },
    }
}
