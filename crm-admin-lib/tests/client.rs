//! Integration tests for AdminClient against a local HTTP server.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::header::AUTHORIZATION;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crm_admin_lib::AdminClient;
use crm_admin_lib::api::CollectionPoller;
use crm_admin_lib::api::FormErrors;
use crm_admin_lib::api::MutationOutcome;
use crm_admin_lib::api::PollConfig;
use crm_admin_lib::auth::StaticTokenProvider;
use crm_admin_lib::error::ApiError;
use crm_admin_lib::error::AuthError;
use crm_admin_lib::error::Error;
use crm_admin_lib::model::Entity;
use crm_admin_lib::model::Record;
use crm_admin_lib::permissions::summarize_field;
use crm_admin_lib::screens::Screen;

#[derive(Debug, Clone)]
struct Captured {
    method: String,
    path: String,
    authorization: Option<String>,
    body: String,
}

struct MockServer {
    url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl MockServer {
    fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serves every request with `handler` until the test ends.
async fn serve<F>(handler: F) -> MockServer
where
    F: Fn(&Captured) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let captured = requests.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handler = handler.clone();
            let captured = captured.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let handler = handler.clone();
                    let captured = captured.clone();
                    async move {
                        let method = req.method().to_string();
                        let path = req.uri().path().to_string();
                        let authorization = req
                            .headers()
                            .get(AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(String::from);
                        let body = req
                            .into_body()
                            .collect()
                            .await
                            .map(|b| b.to_bytes())
                            .unwrap_or_default();

                        let request = Captured {
                            method,
                            path,
                            authorization,
                            body: String::from_utf8_lossy(&body).into_owned(),
                        };
                        let (status, body) = handler(&request);
                        captured.lock().unwrap().push(request);

                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .header("Content-Type", "application/json")
                                .body(Full::new(Bytes::from(body)))
                                .unwrap(),
                        )
                    }
                });

                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    MockServer {
        url: format!("http://{}/api", addr),
        requests,
    }
}

fn client(url: &str, token: &str) -> AdminClient {
    AdminClient::builder()
        .url(url)
        .token_provider(StaticTokenProvider::new(token))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

const USERS: &str = r#"{"users": [
    {"id": 1, "name": "Ada Lovelace", "email": "ada@example.com", "role": "IT Admin"},
    {"id": 2, "name": "Grace Hopper", "email": "grace@example.com", "role": "Agent"},
    {"id": 3, "name": "Alan Turing", "email": "alan@example.com", "role": "Data Analyst"}
]}"#;

#[tokio::test]
async fn test_fetch_sends_bearer_and_parses_collection() {
    let server = serve(|_| (200, USERS.to_string())).await;
    let client = client(&server.url, "session-123");

    let users = client.fetch(&Entity::Users).await.unwrap();

    assert_eq!(users.len(), 3);
    assert_eq!(users[0].get_string("name").unwrap(), Some("Ada Lovelace"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/users");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer session-123"));
}

#[tokio::test]
async fn test_fetched_collection_drives_controller() {
    let server = serve(|_| (200, USERS.to_string())).await;
    let client = client(&server.url, "t");

    let users = client.fetch(&Entity::Users).await.unwrap();
    let mut table = Screen::Users.controller(users).unwrap();
    table.set_search_term("ADMIN");

    let visible = table.visible_records();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].key("id").as_deref(), Some("1"));
}

#[tokio::test]
async fn test_roles_from_wrapped_envelope() {
    let body = r#"{"success": true, "data": [
        {"id": "r1", "name": "Sales", "permissions": {"leads_view": true, "leads_edit": false, "dashboard_view": true}},
        {"id": "r2", "name": "Guest", "permissions": null}
    ]}"#;
    let server = serve(move |_| (200, body.to_string())).await;
    let client = client(&server.url, "t");

    let roles = client.fetch(&Entity::Roles).await.unwrap();

    assert_eq!(summarize_field(&roles[0], "permissions"), "leads_view, dashboard_view");
    assert_eq!(summarize_field(&roles[1], "permissions"), "Not Assigned");
}

#[tokio::test]
async fn test_missing_credential_sends_nothing() {
    let server = serve(|_| (200, USERS.to_string())).await;
    let client = client(&server.url, "   ");

    let err = client.fetch(&Entity::Users).await.unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::MissingCredential)));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_http_error_carries_server_message() {
    let server = serve(|_| (401, r#"{"error": "Invalid token"}"#.to_string())).await;
    let client = client(&server.url, "stale");

    let err = client.fetch(&Entity::AccountRequests).await.unwrap_err();

    let api = err.as_api().unwrap();
    assert_eq!(api.status_code(), Some(401));
    assert_eq!(api.server_message(), Some("Invalid token"));
    assert_eq!(server.requests()[0].path, "/api/requests");
}

#[tokio::test]
async fn test_success_false_on_ok_status_is_error() {
    let server = serve(|_| (200, r#"{"success": false, "error": "Not allowed"}"#.to_string())).await;
    let client = client(&server.url, "t");

    let err = client.fetch(&Entity::Users).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Api(ApiError::Http { status: 200, ref message }) if message == "Not allowed"
    ));
}

#[tokio::test]
async fn test_create_posts_record() {
    let server = serve(|req| {
        if req.method == "POST" {
            (201, r#"{"success": true, "data": {"id": 4, "name": "Katherine"}}"#.to_string())
        } else {
            (405, String::new())
        }
    })
    .await;
    let client = client(&server.url, "t");

    let record = Record::new().set("name", "Katherine").set("email", "kj@example.com");
    let outcome = client.create(&Entity::Users, &record).await.unwrap();

    assert_eq!(outcome.record().unwrap().key("id").as_deref(), Some("4"));

    let requests = server.requests();
    assert_eq!(requests[0].path, "/api/users");
    let sent: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent["email"], "kj@example.com");
    assert_eq!(sent["name"], "Katherine");
}

#[tokio::test]
async fn test_update_puts_to_encoded_id() {
    let server = serve(|_| (200, r#"{"success": true}"#.to_string())).await;
    let client = client(&server.url, "t");

    let changes = Record::new().set("status", "approved");
    let outcome = client
        .update(&Entity::AccountRequests, "req 7", &changes)
        .await
        .unwrap();

    assert_eq!(outcome, MutationOutcome::Acknowledged);
    let requests = server.requests();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].path, "/api/requests/req%207");
}

#[tokio::test]
async fn test_validation_error_maps_to_form_field() {
    let server = serve(|_| (400, r#"{"error": "Email already in use"}"#.to_string())).await;
    let client = client(&server.url, "t");

    let record = Record::new().set("email", "ada@example.com");
    let err = client.create(&Entity::Users, &record).await.unwrap_err();
    let errors = FormErrors::from_error(&err, Screen::Users.form_fields());

    assert_eq!(errors.field("email"), Some("Email already in use"));
    assert!(errors.general().is_none());
}

#[tokio::test]
async fn test_poller_delivers_repeated_fetches() {
    let server = serve(|_| (200, USERS.to_string())).await;
    let client = client(&server.url, "t");

    let config = PollConfig::default().with_interval(Duration::from_millis(50));
    let (poller, mut updates) = CollectionPoller::spawn(client, Entity::Users, config);

    for _ in 0..2 {
        let records = tokio::time::timeout(Duration::from_secs(5), updates.recv())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(records.len(), 3);
    }

    poller.shutdown().await;
    assert!(server.requests().len() >= 2);
}

#[tokio::test]
async fn test_poller_delivers_errors_and_keeps_going() {
    let server = serve(|_| (503, "Service Unavailable".to_string())).await;
    let client = client(&server.url, "t");

    let config = PollConfig::default().with_interval(Duration::from_millis(50));
    let (poller, mut updates) = CollectionPoller::spawn(client, Entity::Roles, config);

    for _ in 0..2 {
        let result = tokio::time::timeout(Duration::from_secs(5), updates.recv())
            .await
            .unwrap()
            .unwrap();
        let err = result.unwrap_err();
        assert_eq!(err.as_api().and_then(|e| e.status_code()), Some(503));
    }

    poller.stop();
    assert!(poller.is_stopped());
}
