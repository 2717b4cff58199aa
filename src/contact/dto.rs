use serde::Deserialize;

/// Contact form submission. Missing fields default to empty.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub query: String,
}
