use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use wsis_admin_api::{router, ApiConfig, AppState, Config};
use wsis_domain::{
    AppConfig, EnvConfigurationAdapter, Environment, IdentityAdminService, IdentityServerConfig,
    LoggingConfig, NewTenant, RoleListUpdate, ServiceError, ServiceResult, TenantManager,
    UserStoreManager, ADD_ROLE_FAILED,
};

/// User store with fixed answers; fails every call while `failing` is set
struct StubUserStore {
    failing: bool,
    updates: Mutex<Vec<(String, RoleListUpdate)>>,
}

impl StubUserStore {
    fn answer<T>(&self, value: T) -> ServiceResult<T> {
        if self.failing {
            Err(ServiceError::fault("soapenv:Server", "Access denied"))
        } else {
            Ok(value)
        }
    }
}

#[async_trait]
impl UserStoreManager for StubUserStore {
    async fn add_user(&self, _: &str, _: &str, _: &str) -> ServiceResult<()> {
        self.answer(())
    }
    async fn delete_user(&self, _: &str) -> ServiceResult<()> {
        self.answer(())
    }
    async fn authenticate(&self, _: &str, password: &str) -> ServiceResult<bool> {
        self.answer(password == "s3cret")
    }
    async fn is_existing_user(&self, username: &str) -> ServiceResult<bool> {
        self.answer(username == "alice")
    }
    async fn list_users(&self) -> ServiceResult<Vec<String>> {
        self.answer(vec!["admin".to_string(), "alice".to_string()])
    }
    async fn is_existing_role(&self, role: &str) -> ServiceResult<bool> {
        self.answer(role == "admin")
    }
    async fn add_role(&self, _: &str) -> ServiceResult<()> {
        self.answer(())
    }
    async fn delete_role(&self, _: &str) -> ServiceResult<()> {
        self.answer(())
    }
    async fn get_role_names(&self) -> ServiceResult<Vec<String>> {
        self.answer(vec!["admin".to_string(), "Internal/everyone".to_string()])
    }
    async fn get_role_list_of_user(&self, _: &str) -> ServiceResult<Vec<String>> {
        self.answer(vec!["Internal/everyone".to_string()])
    }
    async fn get_user_list_of_role(&self, _: &str) -> ServiceResult<Vec<String>> {
        self.answer(vec!["admin".to_string()])
    }
    async fn update_role_list_of_user(
        &self,
        username: &str,
        update: &RoleListUpdate,
    ) -> ServiceResult<()> {
        self.updates
            .lock()
            .unwrap()
            .push((username.to_string(), update.clone()));
        self.answer(())
    }
    async fn get_tenant_id(&self) -> ServiceResult<i32> {
        self.answer(-1234)
    }
}

struct StubTenantManager {
    tenants: Mutex<Vec<NewTenant>>,
}

#[async_trait]
impl TenantManager for StubTenantManager {
    async fn add_tenant(&self, tenant: &NewTenant) -> ServiceResult<()> {
        self.tenants.lock().unwrap().push(tenant.clone());
        // The real service answers tenant creation with a fault as well
        Err(ServiceError::fault("soapenv:Server", "Error while adding tenant"))
    }
}

fn test_config(api_key: Option<&str>) -> Config {
    let api = ApiConfig {
        port: 0,
        api_key: api_key.map(str::to_string),
    };
    let app = AppConfig {
        environment: Environment::Test,
        identity_server: IdentityServerConfig::new(
            "admin",
            None,
            "localhost",
            "https://localhost:9443/services/",
            None,
            false,
            false,
        ),
        logging: LoggingConfig::default(),
    };
    Config::new(api, EnvConfigurationAdapter::from_config(app))
}

struct TestApp {
    app: Router,
    user_store: Arc<StubUserStore>,
    tenants: Arc<StubTenantManager>,
}

fn test_app(failing: bool, api_key: Option<&str>) -> TestApp {
    let user_store = Arc::new(StubUserStore {
        failing,
        updates: Mutex::new(Vec::new()),
    });
    let tenants = Arc::new(StubTenantManager {
        tenants: Mutex::new(Vec::new()),
    });
    let admin = IdentityAdminService::new(user_store.clone(), tenants.clone());
    let app = router(AppState::with_service(test_config(api_key), admin));

    TestApp {
        app,
        user_store,
        tenants,
    }
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_health_is_open_even_with_api_key() {
    let test = test_app(false, Some("secret-key"));

    let (status, body) = send(&test.app, request("GET", "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn test_api_key_is_enforced_when_configured() {
    let test = test_app(false, Some("secret-key"));

    let (status, _) = send(&test.app, request("GET", "/api/users", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let authorized = Request::builder()
        .uri("/api/users")
        .header("x-api-key", "secret-key")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&test.app, authorized).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["admin", "alice"]));
}

#[tokio::test]
async fn test_user_endpoints() {
    let test = test_app(false, None);

    let (status, body) = send(
        &test.app,
        request(
            "POST",
            "/api/users",
            Some(json!({"username": "bob", "password": "pw", "full_name": "Bob Builder"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let (_, body) = send(&test.app, request("GET", "/api/users/alice/exists", None)).await;
    assert_eq!(body["data"]["exists"], true);

    let (_, body) = send(
        &test.app,
        request(
            "POST",
            "/api/users/alice/authenticate",
            Some(json!({"password": "s3cret"})),
        ),
    )
    .await;
    assert_eq!(body["data"]["authenticated"], true);

    let (_, body) = send(&test.app, request("GET", "/api/users/alice/roles", None)).await;
    assert_eq!(body["data"], json!(["Internal/everyone"]));

    let (status, _) = send(&test.app, request("DELETE", "/api/users/bob", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_roles_forwards_role_list() {
    let test = test_app(false, None);

    let (status, _) = send(
        &test.app,
        request(
            "PUT",
            "/api/users/alice/roles",
            Some(json!({"new_roles": ["editors"], "deleted_roles": ["viewers"]})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updates = test.user_store.updates.lock().unwrap().clone();
    assert_eq!(
        updates,
        vec![(
            "alice".to_string(),
            RoleListUpdate::new().remove("viewers").add("editors")
        )]
    );
}

#[tokio::test]
async fn test_role_endpoints() {
    let test = test_app(false, None);

    let (_, body) = send(&test.app, request("GET", "/api/roles", None)).await;
    assert_eq!(body["data"], json!(["admin", "Internal/everyone"]));

    let (_, body) = send(&test.app, request("GET", "/api/roles/admin/exists", None)).await;
    assert_eq!(body["data"]["exists"], true);

    let (_, body) = send(&test.app, request("GET", "/api/roles/admin/users", None)).await;
    assert_eq!(body["data"], json!(["admin"]));

    let (status, _) = send(
        &test.app,
        request("POST", "/api/roles", Some(json!({"name": "editors"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&test.app, request("DELETE", "/api/roles/editors", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_role_name_is_rejected_locally() {
    let test = test_app(false, None);

    let (status, body) = send(
        &test.app,
        request("POST", "/api/roles", Some(json!({"name": "  "}))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_remote_failure_maps_to_bad_gateway_with_fixed_message() {
    let test = test_app(true, None);

    let (status, body) = send(
        &test.app,
        request("POST", "/api/roles", Some(json!({"name": "editors"}))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], ADD_ROLE_FAILED);
}

#[tokio::test]
async fn test_tenant_endpoints() {
    let test = test_app(false, None);

    let (_, body) = send(&test.app, request("GET", "/api/tenant", None)).await;
    assert_eq!(body["data"]["tenant_id"], -1234);

    let (status, body) = send(
        &test.app,
        request(
            "POST",
            "/api/tenants",
            Some(json!({
                "active": true,
                "admin_username": "acme-admin",
                "admin_password": "Acme#2024",
                "email": "ops@acme.test",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "tenant_domain": "acme.test"
            })),
        ),
    )
    .await;

    // The swallowed fault never reaches the client
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["success"], true);
    assert_eq!(test.tenants.tenants.lock().unwrap().len(), 1);
}
