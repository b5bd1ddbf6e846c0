//! HTTP probe backed by `reqwest`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::errors::DiagError;
use crate::probes::HttpProbe;

/// Shares one connection pool across every service and connectivity probe
#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    pub fn new() -> Result<Self, DiagError> {
        let client = Client::builder()
            .user_agent(concat!("deploydiag/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn get(&self, url: &str, timeout: Duration) -> Result<u16, DiagError> {
        debug!("GET {}", url);
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);
        Ok(status.as_u16())
    }
}
