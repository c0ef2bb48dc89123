//! Shared helpers: a router over an in-memory database and tokens signed
//! with the fixture RSA key

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use coffeeshop_api::{
    api::auth::{JwkSet, KeySource, StaticKeySource},
    config::Config,
    server::{build_router, AppState},
    storage::{DrinkRepository, SqliteDrinkRepository},
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const KID: &str = "test-key";
pub const AUDIENCE: &str = "drinks";
pub const ISSUER: &str = "https://chad-fsnd.auth0.com/";

const PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/test_rsa_key.pem");
const MODULUS: &str = "gpEa-c7FNFubcCCcOASWHlduXh3Ljsuq72S75ww7PAsicJbMlEJ9Gnn1dnCzVluYXrTQKYeXYHcUa9yai4Y5GGHb7085_E7bbmb3WNL4-EmOwCDBGQku_XFGOXC5SLcFiMtWIdjaUaBOSFN3hAlL1y2us52Q__RcvlkqQzl7J1wV4jFNJ6aF122X74U1ega8mKVvZOXdLxOknSKOk4RLsLhaMK1R5o5OuL3tZGa3HujpgofWTYTtHllaHUUM87mE0icRQskYxLcKRK51rPGjO_XT0KCBeestssaep8ePA7V45Ui-a52etXXU2gULcqED0yX6TgcA7ZDX8rTo4S9Vfw";

pub const BARISTA: &[&str] = &["get:drinks-detail"];
pub const MANAGER: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

/// JWKS document publishing the fixture key
pub fn jwks_json() -> Value {
    json!({
        "keys": [{
            "kty": "RSA",
            "kid": KID,
            "alg": "RS256",
            "use": "sig",
            "n": MODULUS,
            "e": "AQAB"
        }]
    })
}

pub fn jwks() -> JwkSet {
    serde_json::from_value(jwks_json()).unwrap()
}

/// Sign arbitrary claims with the fixture key under `kid`
pub fn sign_with_kid(claims: &Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY).unwrap();
    encode(&header, claims, &key).unwrap()
}

pub fn sign(claims: &Value) -> String {
    sign_with_kid(claims, KID)
}

/// Claims of a valid access token, without a `permissions` claim
pub fn base_claims() -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "sub": "auth0|test-user",
        "aud": AUDIENCE,
        "iss": ISSUER,
        "iat": now,
        "exp": now + 3600
    })
}

/// A valid token carrying `permissions`
pub fn token(permissions: &[&str]) -> String {
    let mut claims = base_claims();
    claims["permissions"] = json!(permissions);
    sign(&claims)
}

pub struct TestApp {
    pub router: Router,
    pub drinks: Arc<SqliteDrinkRepository>,
}

/// Router over a freshly seeded in-memory database
pub async fn test_app() -> TestApp {
    test_app_with_keys(Arc::new(StaticKeySource::new(jwks()))).await
}

pub async fn test_app_with_keys(keys: Arc<dyn KeySource>) -> TestApp {
    test_app_with(Config::default(), keys).await
}

pub async fn test_app_with(config: Config, keys: Arc<dyn KeySource>) -> TestApp {
    let drinks = Arc::new(SqliteDrinkRepository::in_memory().await.unwrap());
    drinks.reset().await.unwrap();

    let state = AppState::new(Arc::new(config), drinks.clone(), keys);
    TestApp {
        router: build_router(state),
        drinks,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }
}

/// Build a request with an optional bearer token and raw body
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
