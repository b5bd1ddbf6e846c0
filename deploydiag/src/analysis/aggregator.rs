//! Health signal collection and merging
//!
//! Probes run concurrently, bounded by a semaphore, each under its own
//! timeout. Every probe owns exactly one output signal; signals are merged
//! into the report only after every probe has finished or timed out. A probe
//! task that dies still leaves its degraded signal behind.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::analysis::grading::{HealthCriteria, HealthThresholds};
use crate::errors::DiagError;
use crate::models::health::{
    ConnectivityStatus, HealthReport, HealthSignal, OverallHealth, SecurityCheck, ServiceStatus,
};
use crate::probes::{HttpProbe, ResourceProbe, SecurityProbe};

pub use crate::probes::{SecurityTarget, ServiceTarget};

/// Aggregator configuration
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    pub services: Vec<ServiceTarget>,
    pub connectivity: Vec<String>,
    pub security: Vec<SecurityTarget>,
    pub resource_timeout: Duration,
    pub service_timeout: Duration,
    pub connectivity_timeout: Duration,
    pub security_timeout: Duration,

    /// Upper bound on probes in flight
    pub max_concurrent: usize,

    pub thresholds: HealthThresholds,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            services: Vec::new(),
            connectivity: Vec::new(),
            security: Vec::new(),
            resource_timeout: Duration::from_secs(5),
            service_timeout: Duration::from_secs(10),
            connectivity_timeout: Duration::from_secs(5),
            security_timeout: Duration::from_secs(10),
            max_concurrent: 16,
            thresholds: HealthThresholds::default(),
        }
    }
}

/// Probe collaborators; any of them may be absent
#[derive(Clone, Default)]
pub struct Probes {
    pub resources: Option<Arc<dyn ResourceProbe>>,
    pub http: Option<Arc<dyn HttpProbe>>,
    pub security: Option<Arc<dyn SecurityProbe>>,
}

impl Probes {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Merge signals into a graded report
///
/// Signals are keyed by service name, target or check name; a later signal
/// with the same key replaces an earlier one.
pub fn aggregate<I>(timestamp: DateTime<Local>, signals: I, thresholds: &HealthThresholds) -> HealthReport
where
    I: IntoIterator<Item = HealthSignal>,
{
    let mut report = HealthReport {
        timestamp,
        resources: None,
        services: Default::default(),
        connectivity: Default::default(),
        security: Default::default(),
        overall_health: OverallHealth::Critical,
    };

    for signal in signals {
        match signal {
            HealthSignal::ResourceUsage(usage) => report.resources = Some(usage),
            HealthSignal::ServiceStatus(status) => {
                report.services.insert(status.name.clone(), status);
            }
            HealthSignal::ConnectivityStatus(status) => {
                report.connectivity.insert(status.target.clone(), status);
            }
            HealthSignal::SecurityCheck(check) => {
                report.security.insert(check.name.clone(), check);
            }
        }
    }

    let criteria = HealthCriteria::evaluate(
        report.resources.as_ref(),
        &report.services,
        &report.connectivity,
        &report.security,
        thresholds,
    );
    report.overall_health = criteria.grade();
    debug!("Health criteria: {:?} ({} passing)", criteria, criteria.passing());

    report
}

/// A spawned probe and the signal reported if it produces nothing
struct Pending {
    label: String,
    fallback: Option<HealthSignal>,
    handle: JoinHandle<Option<HealthSignal>>,
}

/// Collects live signals from the configured probes
pub struct HealthAggregator {
    options: AggregatorOptions,
    probes: Probes,
    semaphore: Arc<Semaphore>,
}

impl HealthAggregator {
    pub fn new(options: AggregatorOptions, probes: Probes) -> Self {
        let semaphore = Arc::new(Semaphore::new(options.max_concurrent.max(1)));
        Self {
            options,
            probes,
            semaphore,
        }
    }

    /// Run every probe once and merge the results
    pub async fn collect(&self) -> HealthReport {
        let timestamp = Local::now();
        let mut pending: Vec<Pending> = Vec::new();

        if let Some(probe) = &self.probes.resources {
            let probe = Arc::clone(probe);
            let timeout = self.options.resource_timeout;
            pending.push(self.spawn("resources", None, async move {
                let usage = bounded("resources", timeout, probe.sample()).await?;
                Some(HealthSignal::ResourceUsage(usage))
            }));
        }

        match &self.probes.http {
            Some(http) => {
                for target in &self.options.services {
                    let http = Arc::clone(http);
                    let target = target.clone();
                    let timeout = self.options.service_timeout;
                    let fallback = HealthSignal::ServiceStatus(ServiceStatus::unreachable(&target.name));
                    pending.push(self.spawn(&target.name.clone(), Some(fallback), async move {
                        let code = bounded(&target.name, timeout, http.get(&target.url, timeout)).await;
                        let status = match code {
                            Some(code) => ServiceStatus::reached(target.name, code),
                            None => ServiceStatus::unreachable(target.name),
                        };
                        Some(HealthSignal::ServiceStatus(status))
                    }));
                }
                for url in &self.options.connectivity {
                    let http = Arc::clone(http);
                    let url = url.clone();
                    let timeout = self.options.connectivity_timeout;
                    let fallback = HealthSignal::ConnectivityStatus(ConnectivityStatus::unreachable(&url));
                    pending.push(self.spawn(&url.clone(), Some(fallback), async move {
                        let code = bounded(&url, timeout, http.get(&url, timeout)).await;
                        let status = match code {
                            Some(code) => ConnectivityStatus::reached(url, code),
                            None => ConnectivityStatus::unreachable(url),
                        };
                        Some(HealthSignal::ConnectivityStatus(status))
                    }));
                }
            }
            None if !self.options.services.is_empty() || !self.options.connectivity.is_empty() => {
                warn!("No HTTP probe available, skipping service and connectivity checks");
            }
            None => {}
        }

        match &self.probes.security {
            Some(probe) => {
                for target in &self.options.security {
                    let probe = Arc::clone(probe);
                    let target = target.clone();
                    let timeout = self.options.security_timeout;
                    let fallback = HealthSignal::SecurityCheck(SecurityCheck::failed(&target.name));
                    pending.push(self.spawn(&target.name.clone(), Some(fallback), async move {
                        let valid = bounded(&target.name, timeout, probe.check(&target, timeout)).await;
                        let check = match valid {
                            Some(valid) => SecurityCheck::completed(target.name, valid),
                            None => SecurityCheck::failed(target.name),
                        };
                        Some(HealthSignal::SecurityCheck(check))
                    }));
                }
            }
            None if !self.options.security.is_empty() => {
                warn!("No security probe available, skipping security checks");
            }
            None => {}
        }

        info!("Collecting {} health signals", pending.len());

        let (keys, handles): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .map(|p| ((p.label, p.fallback), p.handle))
            .unzip();

        let mut signals = Vec::with_capacity(handles.len());
        for ((label, fallback), result) in keys.into_iter().zip(join_all(handles).await) {
            let signal = match result {
                Ok(signal) => signal.or(fallback),
                Err(e) => {
                    warn!("Probe task for {} failed: {}", label, e);
                    fallback
                }
            };
            signals.extend(signal);
        }

        let report = aggregate(timestamp, signals, &self.options.thresholds);
        info!("Overall health: {}", report.overall_health);
        report
    }

    fn spawn<F>(&self, label: &str, fallback: Option<HealthSignal>, task: F) -> Pending
    where
        F: Future<Output = Option<HealthSignal>> + Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok()?;
            task.await
        });
        Pending {
            label: label.to_string(),
            fallback,
            handle,
        }
    }
}

/// Await a probe under a timeout, logging and discarding any failure
async fn bounded<T, F>(label: &str, timeout: Duration, probe: F) -> Option<T>
where
    F: Future<Output = Result<T, DiagError>>,
{
    let result = match tokio::time::timeout(timeout, probe).await {
        Ok(result) => result,
        Err(_) => Err(DiagError::Timeout(format!("{} after {:?}", label, timeout))),
    };
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Probe {} failed: {}", label, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::health::ResourceUsage;

    #[test]
    fn test_aggregate_merges_by_key() {
        let signals = vec![
            HealthSignal::ServiceStatus(ServiceStatus::unreachable("api")),
            HealthSignal::ServiceStatus(ServiceStatus::reached("api", 200)),
            HealthSignal::ServiceStatus(ServiceStatus::reached("web", 503)),
            HealthSignal::ResourceUsage(ResourceUsage {
                cpu_pct: 12.0,
                memory_pct: 40.0,
                disk_pct: 55.0,
            }),
        ];
        let report = aggregate(Local::now(), signals, &HealthThresholds::default());

        assert_eq!(report.services.len(), 2);
        assert!(report.services["api"].is_healthy());
        assert!(!report.services["web"].is_healthy());
        assert_eq!(report.resources.map(|r| r.cpu_pct), Some(12.0));
        // services fail, everything else passes
        assert_eq!(report.overall_health, OverallHealth::Good);
    }

    #[test]
    fn test_aggregate_nothing() {
        let report = aggregate(Local::now(), Vec::new(), &HealthThresholds::default());
        assert!(report.resources.is_none());
        assert!(report.services.is_empty());
        assert_eq!(report.overall_health, OverallHealth::NeedsAttention);
    }
}
