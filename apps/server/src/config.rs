//! Environment-driven server configuration.

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub db_path: String,
}

impl Config {
    /// Loads configuration from the environment, reading a `.env` file first
    /// when one is present. `PORT` is honored for compatibility with common
    /// deployment setups.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let listen_addr = std::env::var("CARHUB_LISTEN_ADDR").unwrap_or_else(|_| {
            let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
            format!("0.0.0.0:{port}")
        });
        let db_path =
            std::env::var("CARHUB_DB_PATH").unwrap_or_else(|_| "carhub.db".to_string());

        Config {
            listen_addr,
            db_path,
        }
    }
}
