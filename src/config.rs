// Application configuration via the 'config' crate, layered as
// defaults -> optional config.toml -> APP_-prefixed environment variables.
// A .env file is loaded first so local development can keep the API key
// out of the shell profile.

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_address: String,
    // Absent key is tolerated: the generative backend then reports itself
    // unavailable and the orchestrator's fallback path covers it.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_timeout_secs: u64,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            .set_default("server_address", "127.0.0.1:3000")?
            .set_default("gemini_model", "gemini-1.5-flash")?
            .set_default("gemini_timeout_secs", 20)?
            .add_source(File::with_name("config").required(false))
            // e.g. APP_GEMINI_API_KEY, APP_SERVER_ADDRESS
            .add_source(Environment::with_prefix("APP"));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }
}
