use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub grading: GradingSettings,
    pub auth: AuthSettings,
}

/// Bind parameters for the HTTP boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// The interface to bind to (e.g., "0.0.0.0").
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parameters for the external grading service call.
#[derive(Debug, Clone, Deserialize)]
pub struct GradingSettings {
    /// The webhook endpoint that evaluates an answer-sheet image.
    pub webhook_url: String,
    /// Hard timeout for a single grading request. The call either completes,
    /// times out, or errors on connection failure; there is no retry here.
    #[serde(default = "default_grading_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_grading_timeout_secs() -> u64 {
    180
}

/// The static credential table checked at login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub users: Vec<Credential>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl AuthSettings {
    /// Returns true when the pair matches a configured credential exactly.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .iter()
            .any(|c| c.username == username && c.password == password)
    }
}
