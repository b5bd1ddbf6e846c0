//! Probe collaborators
//!
//! Each probe produces the raw material for one health signal. The
//! aggregator owns timeouts and maps failures to degraded states, so probe
//! implementations simply report what happened.

pub mod http;
pub mod system;
pub mod tls;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::DiagError;
use crate::models::health::ResourceUsage;

pub use http::ReqwestProbe;
pub use system::SystemResourceProbe;
pub use tls::TlsCertificateProbe;

/// A named HTTP endpoint whose health is checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTarget {
    pub name: String,
    pub url: String,
}

impl ServiceTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A named TLS endpoint whose certificate is verified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityTarget {
    pub name: String,
    pub host: String,

    #[serde(default = "default_tls_port")]
    pub port: u16,

    /// Optional path to a PEM-encoded CA certificate.
    /// When absent, the system certificate store is used.
    #[serde(default)]
    pub ca_cert_path: Option<String>,
}

fn default_tls_port() -> u16 {
    443
}

/// Samples CPU, memory and disk usage
#[async_trait]
pub trait ResourceProbe: Send + Sync {
    async fn sample(&self) -> Result<ResourceUsage, DiagError>;
}

/// Issues an HTTP GET and reports the status code it got back
#[async_trait]
pub trait HttpProbe: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<u16, DiagError>;
}

/// Verifies a certificate. `Ok(false)` means the endpoint answered but its
/// certificate did not verify; `Err` means the check could not be made.
#[async_trait]
pub trait SecurityProbe: Send + Sync {
    async fn check(&self, target: &SecurityTarget, timeout: Duration) -> Result<bool, DiagError>;
}
