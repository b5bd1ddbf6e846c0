//! Health aggregation tests with scripted probes

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use deploydiag::analysis::aggregator::{AggregatorOptions, HealthAggregator, Probes};
use deploydiag::errors::DiagError;
use deploydiag::models::health::{
    ConnectivityState, OverallHealth, ResourceUsage, SecurityState, ServiceState,
};
use deploydiag::probes::{HttpProbe, ResourceProbe, SecurityProbe, SecurityTarget, ServiceTarget};

struct FixedResources(ResourceUsage);

#[async_trait]
impl ResourceProbe for FixedResources {
    async fn sample(&self) -> Result<ResourceUsage, DiagError> {
        Ok(self.0)
    }
}

struct BrokenResources;

#[async_trait]
impl ResourceProbe for BrokenResources {
    async fn sample(&self) -> Result<ResourceUsage, DiagError> {
        Err(DiagError::ProbeError("no disk at mount point".to_string()))
    }
}

/// How a scripted endpoint answers
#[derive(Clone, Copy)]
enum Reply {
    Code(u16),
    Refused,
    Hang,
    Crash,
}

#[derive(Default)]
struct ScriptedHttp {
    replies: HashMap<String, Reply>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedHttp {
    fn new(replies: &[(&str, Reply)]) -> Self {
        Self {
            replies: replies
                .iter()
                .map(|(url, reply)| (url.to_string(), *reply))
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl HttpProbe for ScriptedHttp {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<u16, DiagError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let reply = self.replies.get(url).copied().unwrap_or(Reply::Refused);
        let result = match reply {
            Reply::Code(code) => Ok(code),
            Reply::Refused => Err(DiagError::ProbeError(format!("connection refused: {url}"))),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(200)
            }
            Reply::Crash => panic!("client state corrupted for {url}"),
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

struct ScriptedSecurity;

#[async_trait]
impl SecurityProbe for ScriptedSecurity {
    async fn check(&self, target: &SecurityTarget, _timeout: Duration) -> Result<bool, DiagError> {
        match target.name.as_str() {
            "valid_cert" => Ok(true),
            "expired_cert" => Ok(false),
            "slow_cert" => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(true)
            }
            _ => Err(DiagError::TlsError("handshake failed".to_string())),
        }
    }
}

fn healthy_usage() -> ResourceUsage {
    ResourceUsage {
        cpu_pct: 20.0,
        memory_pct: 30.0,
        disk_pct: 40.0,
    }
}

fn security_target(name: &str) -> SecurityTarget {
    SecurityTarget {
        name: name.to_string(),
        host: "localhost".to_string(),
        port: 443,
        ca_cert_path: None,
    }
}

fn options() -> AggregatorOptions {
    AggregatorOptions {
        services: vec![
            ServiceTarget::new("backend", "http://svc/backend"),
            ServiceTarget::new("frontend", "http://svc/frontend"),
        ],
        connectivity: vec!["https://example.com".to_string()],
        security: vec![security_target("valid_cert")],
        service_timeout: Duration::from_millis(200),
        connectivity_timeout: Duration::from_millis(200),
        security_timeout: Duration::from_millis(200),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_all_criteria_pass() {
    let http = ScriptedHttp::new(&[
        ("http://svc/backend", Reply::Code(200)),
        ("http://svc/frontend", Reply::Code(200)),
        ("https://example.com", Reply::Code(200)),
    ]);
    let probes = Probes {
        resources: Some(Arc::new(FixedResources(healthy_usage()))),
        http: Some(Arc::new(http)),
        security: Some(Arc::new(ScriptedSecurity)),
    };

    let report = HealthAggregator::new(options(), probes).collect().await;

    assert_eq!(report.services.len(), 2);
    assert_eq!(report.connectivity.len(), 1);
    assert_eq!(report.security["valid_cert"].status, SecurityState::Valid);
    assert_eq!(report.resources, Some(healthy_usage()));
    assert_eq!(report.overall_health, OverallHealth::Excellent);
}

#[tokio::test]
async fn test_failures_degrade_individual_signals() {
    let http = ScriptedHttp::new(&[
        ("http://svc/backend", Reply::Code(503)),
        ("http://svc/frontend", Reply::Refused),
        ("https://example.com", Reply::Hang),
    ]);
    let mut options = options();
    options.security = vec![security_target("expired_cert"), security_target("unreachable_host")];
    let probes = Probes {
        resources: Some(Arc::new(FixedResources(ResourceUsage {
            cpu_pct: 95.0,
            memory_pct: 30.0,
            disk_pct: 40.0,
        }))),
        http: Some(Arc::new(http)),
        security: Some(Arc::new(ScriptedSecurity)),
    };

    let report = HealthAggregator::new(options, probes).collect().await;

    let backend = &report.services["backend"];
    assert_eq!(backend.status, ServiceState::Unhealthy);
    assert_eq!(backend.status_code, Some(503));
    assert!(backend.reachable);

    let frontend = &report.services["frontend"];
    assert_eq!(frontend.status, ServiceState::Unreachable);
    assert_eq!(frontend.status_code, None);

    let target = &report.connectivity["https://example.com"];
    assert_eq!(target.status, ConnectivityState::Unreachable);
    assert!(!target.reachable);

    assert_eq!(report.security["expired_cert"].status, SecurityState::Invalid);
    assert_eq!(report.security["unreachable_host"].status, SecurityState::CheckFailed);

    // only memory and disk pass
    assert_eq!(report.overall_health, OverallHealth::NeedsAttention);
}

#[tokio::test]
async fn test_zero_sources_still_reports() {
    let report = HealthAggregator::new(AggregatorOptions::default(), Probes::none())
        .collect()
        .await;

    assert!(report.resources.is_none());
    assert!(report.services.is_empty());
    assert!(report.connectivity.is_empty());
    assert!(report.security.is_empty());
    assert_eq!(report.overall_health, OverallHealth::NeedsAttention);
}

#[tokio::test]
async fn test_configured_targets_without_probes_are_skipped() {
    let report = HealthAggregator::new(options(), Probes::none()).collect().await;
    assert!(report.services.is_empty());
    assert!(report.security.is_empty());
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let services: Vec<_> = (0..8)
        .map(|i| ServiceTarget::new(format!("svc-{i}"), format!("http://svc/{i}")))
        .collect();
    let replies: Vec<(String, Reply)> = services
        .iter()
        .map(|s| (s.url.clone(), Reply::Code(200)))
        .collect();
    let replies: Vec<(&str, Reply)> = replies.iter().map(|(u, r)| (u.as_str(), *r)).collect();
    let http = Arc::new(ScriptedHttp::new(&replies));

    let options = AggregatorOptions {
        services,
        max_concurrent: 2,
        service_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let probes = Probes {
        http: Some(http.clone()),
        ..Default::default()
    };

    let report = HealthAggregator::new(options, probes).collect().await;

    assert_eq!(report.services.len(), 8);
    assert!(report.services.values().all(|s| s.is_healthy()));
    assert!(http.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_crashed_probe_task_reports_unreachable() {
    let http = ScriptedHttp::new(&[
        ("http://svc/backend", Reply::Crash),
        ("http://svc/frontend", Reply::Code(200)),
        ("https://example.com", Reply::Crash),
    ]);
    let probes = Probes {
        resources: Some(Arc::new(FixedResources(healthy_usage()))),
        http: Some(Arc::new(http)),
        security: Some(Arc::new(ScriptedSecurity)),
    };

    let report = HealthAggregator::new(options(), probes).collect().await;

    let backend = &report.services["backend"];
    assert_eq!(backend.status, ServiceState::Unreachable);
    assert!(!backend.reachable);
    assert_eq!(report.services["frontend"].status, ServiceState::Healthy);
    assert_eq!(
        report.connectivity["https://example.com"].status,
        ConnectivityState::Unreachable
    );

    // services and connectivity fail, the other four pass
    assert_eq!(report.overall_health, OverallHealth::Good);
}

#[tokio::test]
async fn test_security_timeout_is_check_failed() {
    let mut options = options();
    options.services.clear();
    options.connectivity.clear();
    options.security = vec![security_target("valid_cert"), security_target("slow_cert")];
    let probes = Probes {
        resources: Some(Arc::new(FixedResources(healthy_usage()))),
        security: Some(Arc::new(ScriptedSecurity)),
        ..Default::default()
    };

    let report = HealthAggregator::new(options, probes).collect().await;

    assert_eq!(report.security["valid_cert"].status, SecurityState::Valid);
    let slow = &report.security["slow_cert"];
    assert_eq!(slow.status, SecurityState::CheckFailed);
    assert!(!slow.valid);
    assert_eq!(report.overall_health, OverallHealth::Good);
}

#[tokio::test]
async fn test_failed_resource_sample_fails_resource_criteria() {
    let http = ScriptedHttp::new(&[
        ("http://svc/backend", Reply::Code(200)),
        ("http://svc/frontend", Reply::Code(200)),
        ("https://example.com", Reply::Code(200)),
    ]);
    let probes = Probes {
        resources: Some(Arc::new(BrokenResources)),
        http: Some(Arc::new(http)),
        security: Some(Arc::new(ScriptedSecurity)),
    };

    let report = HealthAggregator::new(options(), probes).collect().await;

    assert!(report.resources.is_none());
    assert_eq!(report.services.len(), 2);
    // cpu, memory and disk all fail
    assert_eq!(report.overall_health, OverallHealth::NeedsAttention);
}
