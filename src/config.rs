use std::{env, net::SocketAddr, path::PathBuf};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub listen_addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let api_base_url = parse_api_base_url(
            &env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080/".to_string()),
        )?;

        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        Ok(Self {
            api_base_url,
            listen_addr,
            static_dir,
        })
    }
}

pub fn parse_api_base_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| AppError::Config(format!("invalid API_BASE_URL: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(AppError::Config(format!(
            "API_BASE_URL must be an http(s) base url, got {url}"
        )));
    }
    Ok(url)
}
