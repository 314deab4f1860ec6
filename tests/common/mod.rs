use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

use financas_auth::modules::auth::memory::{
    MemorySessionRepo, MemoryTwoFactorTokenRepo, MemoryUserRepo,
};
use financas_auth::services::jwt::JwtService;
use financas_auth::services::mailer::MemoryMailer;
use financas_auth::{create_app, AppState};

#[allow(dead_code)]
pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";

// Allow dead_code for utilities used by other test files
#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    /// Stand-in inbox: the codes the user would read from their email.
    pub mailer: Arc<MemoryMailer>,
    /// Direct handle on stored challenges, used to force expiry.
    pub two_factor_tokens: Arc<MemoryTwoFactorTokenRepo>,
    /// Direct handle on user rows, used to stage narrow races.
    pub users: Arc<MemoryUserRepo>,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        let mailer = Arc::new(MemoryMailer::default());
        let two_factor_tokens = Arc::new(MemoryTwoFactorTokenRepo::default());
        let users = Arc::new(MemoryUserRepo::default());

        let state = AppState {
            users: users.clone(),
            sessions: Arc::new(MemorySessionRepo::default()),
            two_factor_tokens: two_factor_tokens.clone(),
            jwt: JwtService::new(JWT_SECRET.to_string()),
            mailer: mailer.clone(),
        };

        let app = create_app(state, 10_000).await;
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            mailer,
            two_factor_tokens,
            users,
        }
    }

    pub async fn register(&self, email: &str) {
        let response = self
            .server
            .post("/auth/register")
            .json(&json!({
                "nome": "Test User",
                "email": email,
                "senha": test_password()
            }))
            .await;
        assert_eq!(response.status_code().as_u16(), 201);
    }

    /// Registers and logs in (2FA off), returning the bearer token.
    pub async fn register_and_login(&self, email: &str) -> String {
        self.register(email).await;
        self.login(email, test_password()).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/auth/login")
            .json(&json!({ "email": email, "senha": password }))
            .await;

        let body: serde_json::Value = response.json();
        body["token"]
            .as_str()
            .unwrap_or_else(|| panic!("login did not return a token: {}", body))
            .to_string()
    }

    /// Runs the full enable flow: request a code, read it off the recorded
    /// email, confirm.
    pub async fn enable_two_factor(&self, email: &str, token: &str) {
        let response = self
            .server
            .post("/security/2fa/request")
            .authorization_bearer(token)
            .await;
        let body: serde_json::Value = response.json();
        let token_id = body["tokenId"].as_str().expect("no tokenId").to_string();

        let code = self.mailer.last_code_for(email).expect("no code recorded");

        let response = self
            .server
            .post("/security/2fa/confirm")
            .authorization_bearer(token)
            .json(&json!({ "tokenId": token_id, "code": code }))
            .await;
        assert_eq!(response.status_code().as_u16(), 204);
    }

    /// Logs in with 2FA on and completes the emailed challenge, returning
    /// the bearer token.
    pub async fn login_with_two_factor(&self, email: &str, device_name: Option<&str>) -> String {
        let mut body = json!({ "email": email, "senha": test_password() });
        if let Some(name) = device_name {
            body["deviceName"] = json!(name);
        }

        let response = self.server.post("/auth/login").json(&body).await;
        let challenge: serde_json::Value = response.json();
        let token_id = challenge["twoFactorTokenId"]
            .as_str()
            .unwrap_or_else(|| panic!("expected a two-factor challenge: {}", challenge))
            .to_string();

        let code = self.mailer.last_code_for(email).expect("no code recorded");

        let mut verify_body = json!({ "tokenId": token_id, "code": code });
        if let Some(name) = device_name {
            verify_body["deviceName"] = json!(name);
        }

        let response = self.server.post("/auth/verify-2fa").json(&verify_body).await;
        let body: serde_json::Value = response.json();
        body["token"]
            .as_str()
            .unwrap_or_else(|| panic!("verify-2fa did not return a token: {}", body))
            .to_string()
    }
}

// Helper to generate unique test email
#[allow(dead_code)]
pub fn test_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}

// Helper to generate test password
#[allow(dead_code)]
pub fn test_password() -> &'static str {
    "s3cret-Pass1"
}
