//! Integration test: hypothesis test client against a mock estimation server

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use causal_explore::dataset::{row, CellValue, FieldMeta, Row};
use causal_explore::hypothesis::{
    CausalContext, CausalGraph, CausalServerConfig, CollectingNotifier, EstimateInput, Filter,
    HypothesisTestClient, NoticeKind, PagLink, PagMark,
};
use causal_explore::ExploreError;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::sync::Arc;

type Captured = Arc<Mutex<Option<Value>>>;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn estimation_router(captured: Captured, reply: Value) -> Router {
    Router::new()
        .route(
            "/v0.1/sess-1/estimate/calc",
            post(
                |State(captured): State<Captured>, Json(body): Json<Value>| async move {
                    *captured.lock() = Some(body);
                    Json(reply)
                },
            ),
        )
        .with_state(captured)
}

fn client(url: &str, session: Option<&str>) -> (HypothesisTestClient, Arc<CollectingNotifier>) {
    let notifier = Arc::new(CollectingNotifier::new());
    let mut config = CausalServerConfig::new(url).with_timeout(5);
    config.session_id = session.map(str::to_string);
    let client = HypothesisTestClient::new(config, notifier.clone()).unwrap();
    (client, notifier)
}

fn sample_rows() -> Vec<Row> {
    vec![
        row([
            ("age", CellValue::from(31)),
            ("city", CellValue::from("Oslo")),
            ("spend", CellValue::from(12.5)),
        ]),
        row([
            ("age", CellValue::from(47)),
            ("city", CellValue::from("Lima")),
            ("spend", CellValue::from(8.0)),
        ]),
    ]
}

fn sample_fields() -> Vec<FieldMeta> {
    vec![
        FieldMeta::quantitative("age"),
        FieldMeta::nominal("city"),
        FieldMeta::quantitative("spend"),
    ]
}

fn sample_model() -> CausalGraph {
    CausalGraph {
        func_deps: Vec::new(),
        edges: vec![PagLink {
            src: "age".to_string(),
            tar: "spend".to_string(),
            src_type: PagMark::Blank,
            tar_type: PagMark::Arrow,
        }],
    }
}

fn sample_input() -> EstimateInput {
    EstimateInput {
        population_picker: vec![Filter::Range {
            fid: "age".to_string(),
            range: [18.0, 65.0],
        }],
        predicates: vec![Filter::Set {
            fid: "city".to_string(),
            values: vec!["Oslo".into()],
        }],
        confounders: vec!["age".to_string()],
        effect_modifiers: Vec::new(),
        outcome: "spend".to_string(),
    }
}

// ============================================================================
// Estimation
// ============================================================================

#[tokio::test]
async fn test_estimate_success_and_payload_shape() {
    let captured: Captured = Arc::new(Mutex::new(None));
    let url = spawn_server(estimation_router(
        captured.clone(),
        json!({ "success": true, "data": { "weight": 0.42 } }),
    ))
    .await;
    let (client, notifier) = client(&url, Some("sess-1"));

    let rows = sample_rows();
    let fields = sample_fields();
    let model = sample_model();
    let context = CausalContext {
        data: &rows,
        fields: &fields,
        model: &model,
    };
    let mut params = Map::new();
    params.insert("method".to_string(), json!("linear"));

    let result = client
        .estimate(&sample_input(), context, &params)
        .await
        .unwrap()
        .expect("session configured");

    assert_eq!(result.weight, 0.42);
    assert!(notifier.is_empty());

    let body = captured.lock().take().expect("request captured");
    assert_eq!(body["outcome"], "spend");
    assert_eq!(body["confounders"], json!(["age"]));
    assert_eq!(body["params"]["method"], "linear");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["fields"].as_array().unwrap().len(), 3);
    assert_eq!(body["causalModel"]["edges"][0]["src"], "age");

    let current = body["groups"]["current"]["predicates"].as_array().unwrap();
    let population = body["groups"]["population"]["predicates"].as_array().unwrap();
    assert_eq!(population.len(), 1);
    assert_eq!(current.len(), 2);
    assert_eq!(current[0], population[0]);
    assert_eq!(current[1]["fid"], "city");
}

#[tokio::test]
async fn test_estimate_http_failure_notifies_status_text() {
    let router = Router::new().route(
        "/v0.1/sess-1/estimate/calc",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let url = spawn_server(router).await;
    let (client, notifier) = client(&url, Some("sess-1"));

    let rows = sample_rows();
    let fields = sample_fields();
    let model = CausalGraph::default();
    let context = CausalContext { data: &rows, fields: &fields, model: &model };

    let err = client
        .estimate(&sample_input(), context, &Map::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExploreError::ServiceStatus { status: 503, ref status_text } if status_text == "Service Unavailable"
    ));

    let notices = notifier.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].title, "HypothesisTest Error");
    assert_eq!(notices[0].content, "Service Unavailable");
}

#[tokio::test]
async fn test_estimate_rejected_notifies_message() {
    let captured: Captured = Arc::new(Mutex::new(None));
    let url = spawn_server(estimation_router(
        captured,
        json!({ "success": false, "message": "outcome has no variance" }),
    ))
    .await;
    let (client, notifier) = client(&url, Some("sess-1"));

    let rows = sample_rows();
    let fields = sample_fields();
    let model = CausalGraph::default();
    let context = CausalContext { data: &rows, fields: &fields, model: &model };

    let err = client
        .estimate(&sample_input(), context, &Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ExploreError::ServiceRejected(ref m) if m == "outcome has no variance"));

    let notices = notifier.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "HypothesisTest Error");
    assert_eq!(notices[0].content, "outcome has no variance");
}

#[tokio::test]
async fn test_estimate_without_session_skips_request() {
    let captured: Captured = Arc::new(Mutex::new(None));
    let url = spawn_server(estimation_router(
        captured.clone(),
        json!({ "success": true, "data": { "weight": 1.0 } }),
    ))
    .await;
    let (client, notifier) = client(&url, None);

    let rows = sample_rows();
    let fields = sample_fields();
    let model = CausalGraph::default();
    let context = CausalContext { data: &rows, fields: &fields, model: &model };

    let result = client.estimate(&sample_input(), context, &Map::new()).await.unwrap();
    assert!(result.is_none());
    assert!(captured.lock().is_none());
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn test_transport_failure_has_no_notice() {
    // bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (client, notifier) = client(&format!("http://{}", addr), Some("sess-1"));
    let rows = sample_rows();
    let fields = sample_fields();
    let model = CausalGraph::default();
    let context = CausalContext { data: &rows, fields: &fields, model: &model };

    let err = client
        .estimate(&sample_input(), context, &Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ExploreError::HttpError(_)));
    assert!(notifier.is_empty());
}

// ============================================================================
// Parameter schema
// ============================================================================

#[tokio::test]
async fn test_fetch_param_schema() {
    let router = Router::new().route(
        "/v0.1/form/estimate",
        get(|| async {
            Json(json!({
                "success": true,
                "data": { "title": "Estimation", "properties": { "method": { "type": "string" } } }
            }))
        }),
    );
    let url = spawn_server(router).await;
    let (client, notifier) = client(&url, None);

    let form = client.fetch_param_schema().await.unwrap().expect("server active");
    assert_eq!(form.0["title"], "Estimation");
    assert_eq!(form.0["properties"]["method"]["type"], "string");
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn test_fetch_param_schema_rejected() {
    let router = Router::new().route(
        "/v0.1/form/estimate",
        get(|| async { Json(json!({ "success": false, "message": "no estimator loaded" })) }),
    );
    let url = spawn_server(router).await;
    let (client, notifier) = client(&url, None);

    let err = client.fetch_param_schema().await.unwrap_err();
    assert!(matches!(err, ExploreError::ServiceRejected(_)));

    let notices = notifier.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Failed to get HypothesisTest param schema");
    assert_eq!(notices[0].content, "no estimator loaded");
}

#[tokio::test]
async fn test_fetch_param_schema_http_failure() {
    let router = Router::new().route(
        "/v0.1/form/estimate",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let url = spawn_server(router).await;
    let (client, notifier) = client(&url, None);

    let err = client.fetch_param_schema().await.unwrap_err();
    assert!(matches!(err, ExploreError::ServiceStatus { status: 500, .. }));
    assert_eq!(notifier.notices()[0].title, "HypothesisTest Error");
}

#[tokio::test]
async fn test_inactive_server_skips_schema() {
    let notifier = Arc::new(CollectingNotifier::new());
    let config = CausalServerConfig::new("http://127.0.0.1:1").with_server_active(false);
    let client = HypothesisTestClient::new(config, notifier.clone()).unwrap();

    assert!(client.fetch_param_schema().await.unwrap().is_none());
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn test_closure_notifier() {
    let router = Router::new().route(
        "/v0.1/form/estimate",
        get(|| async { StatusCode::BAD_GATEWAY }),
    );
    let url = spawn_server(router).await;

    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let notifier = Arc::new(move |notice: causal_explore::hypothesis::Notice| {
        sink.lock().push(notice.content);
    });
    let client = HypothesisTestClient::new(CausalServerConfig::new(url), notifier).unwrap();

    let _ = client.fetch_param_schema().await;
    assert_eq!(seen.lock().as_slice(), ["Bad Gateway".to_string()]);
}
