use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    /// Cookie max age and server-side inactivity expiry, in hours.
    pub hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct Rephrase {
    pub url: String,
    pub key: String,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub session: Session,
    pub rephrase: Rephrase,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000_i64)?
            .set_default("session.hours", 24_i64)?
            .set_default("rephrase.url", "https://api.openai.com/v1")?
            .set_default("rephrase.key", "")?
            .set_default("rephrase.model", "gpt-4o")?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("_"))
            .build()?;

        config.try_deserialize()
    }
}
