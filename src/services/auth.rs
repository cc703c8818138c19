/// Single-capability access check, so the static pair below can be swapped
/// for a real identity provider without touching the filter.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> bool;
}

pub const TREASURY_USERNAME: &str = "tesouraria";
pub const TREASURY_PASSWORD: &str = "alcif0@";

#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(TREASURY_USERNAME, TREASURY_PASSWORD)
    }
}

impl Authenticator for StaticCredentials {
    fn authenticate(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}
