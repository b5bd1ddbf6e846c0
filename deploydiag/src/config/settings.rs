//! Settings file management

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::analysis::aggregator::{AggregatorOptions, SecurityTarget, ServiceTarget};
use crate::analysis::grading::HealthThresholds;
use crate::analysis::recommend::RecommendationThresholds;
use crate::errors::DiagError;
use crate::filesys::file::File;
use crate::logs::{LogLevel, LogOptions};

/// Toolkit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON logs on stdout
    #[serde(default)]
    pub log_json: bool,

    /// Also write logs into this directory
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Input and output locations
    #[serde(default)]
    pub paths: PathSettings,

    /// Services probed over HTTP
    #[serde(default = "default_services")]
    pub services: Vec<ServiceTarget>,

    /// External URLs used to check outbound connectivity
    #[serde(default = "default_connectivity")]
    pub connectivity: Vec<String>,

    /// TLS certificate checks
    #[serde(default = "default_security")]
    pub security: Vec<SecurityTarget>,

    /// Probe timeouts and pool size
    #[serde(default)]
    pub probes: ProbeSettings,

    #[serde(default)]
    pub health_thresholds: HealthThresholds,

    #[serde(default)]
    pub recommendation_thresholds: RecommendationThresholds,

    /// Components listed in the readiness report
    #[serde(default = "default_components")]
    pub components: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_dir: None,
            paths: PathSettings::default(),
            services: default_services(),
            connectivity: default_connectivity(),
            security: default_security(),
            probes: ProbeSettings::default(),
            health_thresholds: HealthThresholds::default(),
            recommendation_thresholds: RecommendationThresholds::default(),
            components: default_components(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// A missing file is not an error: defaults are used. A file that exists
    /// but cannot be parsed is.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DiagError> {
        let file = File::new(path.as_ref());
        match file.read_json::<Settings>().await {
            Ok(settings) => {
                settings.validate()?;
                Ok(settings)
            }
            Err(DiagError::NotFound(path)) => {
                warn!("Settings file not found: {}, using defaults", path);
                Ok(Settings::default())
            }
            Err(e) => Err(DiagError::ConfigError(format!(
                "Unable to read settings file {}: {}",
                file.path().display(),
                e
            ))),
        }
    }

    /// Reject service and connectivity URLs that are not absolute http(s) URLs
    pub fn validate(&self) -> Result<(), DiagError> {
        let services = self.services.iter().map(|s| s.url.as_str());
        let connectivity = self.connectivity.iter().map(String::as_str);
        for raw in services.chain(connectivity) {
            let url = Url::parse(raw)
                .map_err(|e| DiagError::ConfigError(format!("Invalid URL {}: {}", raw, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(DiagError::ConfigError(format!(
                    "Unsupported URL scheme {} in {}",
                    url.scheme(),
                    raw
                )));
            }
        }
        Ok(())
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            log_level: self.log_level.clone(),
            json_format: self.log_json,
            log_dir: self.log_dir.clone(),
            ..Default::default()
        }
    }

    pub fn aggregator_options(&self) -> AggregatorOptions {
        AggregatorOptions {
            services: self.services.clone(),
            connectivity: self.connectivity.clone(),
            security: self.security.clone(),
            resource_timeout: Duration::from_secs(self.probes.resource_timeout_secs),
            service_timeout: Duration::from_secs(self.probes.service_timeout_secs),
            connectivity_timeout: Duration::from_secs(self.probes.connectivity_timeout_secs),
            security_timeout: Duration::from_secs(self.probes.security_timeout_secs),
            max_concurrent: self.probes.max_concurrent.max(1),
            thresholds: self.health_thresholds,
        }
    }
}

/// File locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Deployment log with `[DEPLOY]` markers
    #[serde(default = "default_deployment_log")]
    pub deployment_log: PathBuf,

    /// Metrics documents, merged in order
    #[serde(default = "default_metrics_files")]
    pub metrics_files: Vec<PathBuf>,

    /// Directory scanned for the error-frequency analysis
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Where reports are written
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

const DEFAULT_BASE_DIR: &str = "/var/log/deploydiag";

fn default_deployment_log() -> PathBuf {
    PathBuf::from(DEFAULT_BASE_DIR).join("deployment.log")
}

fn default_metrics_files() -> Vec<PathBuf> {
    vec![
        PathBuf::from(DEFAULT_BASE_DIR).join("performance_metrics.json"),
        PathBuf::from(DEFAULT_BASE_DIR).join("deployment_metrics.json"),
    ]
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BASE_DIR)
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BASE_DIR).join("reports")
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            deployment_log: default_deployment_log(),
            metrics_files: default_metrics_files(),
            log_dir: default_log_dir(),
            report_dir: default_report_dir(),
        }
    }
}

/// Probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Covers the CPU refresh interval as well as the sampling itself
    #[serde(default = "default_resource_timeout")]
    pub resource_timeout_secs: u64,

    #[serde(default = "default_service_timeout")]
    pub service_timeout_secs: u64,

    #[serde(default = "default_connectivity_timeout")]
    pub connectivity_timeout_secs: u64,

    #[serde(default = "default_security_timeout")]
    pub security_timeout_secs: u64,

    /// Upper bound on probes in flight
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Mount point whose usage is reported as disk usage
    #[serde(default = "default_disk_mount")]
    pub disk_mount: PathBuf,
}

fn default_resource_timeout() -> u64 {
    5
}

fn default_service_timeout() -> u64 {
    10
}

fn default_connectivity_timeout() -> u64 {
    5
}

fn default_security_timeout() -> u64 {
    10
}

fn default_max_concurrent() -> usize {
    16
}

fn default_disk_mount() -> PathBuf {
    PathBuf::from("/")
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            resource_timeout_secs: default_resource_timeout(),
            service_timeout_secs: default_service_timeout(),
            connectivity_timeout_secs: default_connectivity_timeout(),
            security_timeout_secs: default_security_timeout(),
            max_concurrent: default_max_concurrent(),
            disk_mount: default_disk_mount(),
        }
    }
}

fn default_services() -> Vec<ServiceTarget> {
    vec![
        ServiceTarget::new("backend", "http://localhost:8000/api/health"),
        ServiceTarget::new("frontend", "http://localhost:8000/"),
        ServiceTarget::new("database", "http://localhost:8000/api/db-health"),
    ]
}

fn default_connectivity() -> Vec<String> {
    vec![
        "https://www.google.com".to_string(),
        "https://github.com".to_string(),
    ]
}

fn default_security() -> Vec<SecurityTarget> {
    vec![SecurityTarget {
        name: "ssl_certificate".to_string(),
        host: "localhost".to_string(),
        port: 443,
        ca_cert_path: None,
    }]
}

fn default_components() -> Vec<String> {
    vec![
        "backend".to_string(),
        "frontend".to_string(),
        "database".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.services.len(), 3);
        assert_eq!(settings.probes.resource_timeout_secs, 5);
        assert_eq!(settings.probes.service_timeout_secs, 10);
        assert_eq!(settings.probes.connectivity_timeout_secs, 5);
        assert_eq!(settings.health_thresholds.cpu_pct, 80.0);
        assert_eq!(settings.recommendation_thresholds.response_time_ms, 500.0);
        assert_eq!(settings.components, vec!["backend", "frontend", "database"]);
    }

    #[test]
    fn test_partial_document() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "log_level": "debug",
                "services": [{"name": "api", "url": "https://api.example.com/health"}],
                "probes": {"max_concurrent": 0},
                "health_thresholds": {"disk_pct": 75}
            }"#,
        )
        .unwrap();

        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.services[0].name, "api");
        assert_eq!(settings.health_thresholds.disk_pct, 75.0);
        assert_eq!(settings.health_thresholds.memory_pct, 85.0);

        let options = settings.aggregator_options();
        assert_eq!(options.max_concurrent, 1);
        assert_eq!(options.service_timeout, Duration::from_secs(10));
        assert_eq!(options.resource_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_validate_urls() {
        assert!(Settings::default().validate().is_ok());

        let mut settings = Settings::default();
        settings.services = vec![ServiceTarget::new("api", "localhost:8000/health")];
        assert!(matches!(settings.validate(), Err(DiagError::ConfigError(_))));

        let mut settings = Settings::default();
        settings.connectivity = vec!["not a url".to_string()];
        assert!(matches!(settings.validate(), Err(DiagError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_load_rejects_bad_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"connectivity": ["ftp://mirror.example.com"]}"#).unwrap();

        let result = Settings::load(&path).await;
        assert!(matches!(result, Err(DiagError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_load_missing_file_defaults() {
        let settings = Settings::load("/nonexistent/deploydiag/settings.json")
            .await
            .unwrap();
        assert_eq!(settings.connectivity.len(), 2);
    }
}
