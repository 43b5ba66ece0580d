use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Directory static content is served from.
    pub root: PathBuf,
    /// Bound on each phase of the nested PDF round trip.
    pub pdf_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            root: PathBuf::from("www"),
            pdf_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads the optional YAML file named by `SAR_CONFIG`, then applies
    /// `LISTEN`, `SAR_ROOT` and `SAR_PDF_TIMEOUT` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("SAR_CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                Self::from_yaml(&text)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("SAR_ROOT") {
            cfg.root = PathBuf::from(root);
        }
        if let Ok(secs) = std::env::var("SAR_PDF_TIMEOUT") {
            cfg.pdf_timeout_secs = secs
                .parse()
                .with_context(|| format!("invalid SAR_PDF_TIMEOUT {:?}", secs))?;
        }

        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("parsing YAML config")
    }

    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }
}
