use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub const DEFAULT_USERNAME: &str = "immudb";
pub const DEFAULT_PASSWORD: &str = "immudb";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Basic-auth style token (`base64(username:password)`).
    pub fn token(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        BASE64.encode(raw)
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
