//! TLS certificate probe backed by `rustls`

use std::io::ErrorKind;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore};
use tracing::{debug, warn};

use crate::errors::DiagError;
use crate::probes::{SecurityProbe, SecurityTarget};

/// Completes a TLS handshake and reports whether the server certificate
/// verified against the trusted roots
#[derive(Debug, Clone, Default)]
pub struct TlsCertificateProbe;

impl TlsCertificateProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecurityProbe for TlsCertificateProbe {
    async fn check(&self, target: &SecurityTarget, timeout: Duration) -> Result<bool, DiagError> {
        let target = target.clone();
        tokio::task::spawn_blocking(move || handshake(&target, timeout))
            .await
            .map_err(|e| DiagError::ProbeError(format!("TLS check panicked: {e}")))?
    }
}

fn handshake(target: &SecurityTarget, timeout: Duration) -> Result<bool, DiagError> {
    let roots = root_store(target.ca_cert_path.as_deref())?;
    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let server_name = ServerName::try_from(target.host.as_str())
        .map_err(|e| DiagError::TlsError(format!("invalid server name {}: {e}", target.host)))?
        .to_owned();
    let mut conn = ClientConnection::new(Arc::new(config), server_name)
        .map_err(|e| DiagError::TlsError(e.to_string()))?;

    let addr = (target.host.as_str(), target.port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| DiagError::NotFound(format!("{}:{}", target.host, target.port)))?;
    let mut sock = TcpStream::connect_timeout(&addr, timeout)?;
    sock.set_read_timeout(Some(timeout))?;
    sock.set_write_timeout(Some(timeout))?;

    while conn.is_handshaking() {
        if let Err(e) = conn.complete_io(&mut sock) {
            let rejected = e.kind() == ErrorKind::InvalidData
                && e
                    .get_ref()
                    .and_then(|inner| inner.downcast_ref::<rustls::Error>())
                    .is_some_and(|tls| matches!(tls, rustls::Error::InvalidCertificate(_)));
            if rejected {
                warn!("Certificate for {}:{} rejected: {}", target.host, target.port, e);
                return Ok(false);
            }
            return Err(DiagError::TlsError(format!(
                "handshake with {}:{} failed: {e}",
                target.host, target.port
            )));
        }
    }

    debug!("Certificate for {}:{} verified", target.host, target.port);
    Ok(true)
}

fn root_store(ca_cert_path: Option<&str>) -> Result<RootCertStore, DiagError> {
    let mut root_cert_store = RootCertStore::empty();

    if let Some(ca_path) = ca_cert_path {
        let ca_pem = std::fs::read(ca_path)
            .map_err(|e| DiagError::TlsError(format!("Failed to read CA cert {ca_path}: {e}")))?;
        let mut cursor = std::io::Cursor::new(ca_pem);
        for cert in rustls_pemfile::certs(&mut cursor).flatten() {
            let _ = root_cert_store.add(cert);
        }
    } else {
        for cert in rustls_native_certs::load_native_certs().unwrap_or_default() {
            let _ = root_cert_store.add(cert);
        }
    }

    if root_cert_store.is_empty() {
        return Err(DiagError::TlsError("no trusted root certificates".to_string()));
    }
    Ok(root_cert_store)
}
