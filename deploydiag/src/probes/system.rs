//! Resource probe backed by `sysinfo`

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sysinfo::{Disks, System};
use tracing::debug;

use crate::errors::DiagError;
use crate::models::health::ResourceUsage;
use crate::probes::ResourceProbe;

/// Samples the local machine
#[derive(Debug, Clone)]
pub struct SystemResourceProbe {
    disk_mount: PathBuf,
}

impl SystemResourceProbe {
    /// `disk_mount` selects the filesystem reported as disk usage
    pub fn new(disk_mount: impl Into<PathBuf>) -> Self {
        Self {
            disk_mount: disk_mount.into(),
        }
    }
}

impl Default for SystemResourceProbe {
    fn default() -> Self {
        Self::new("/")
    }
}

#[async_trait]
impl ResourceProbe for SystemResourceProbe {
    async fn sample(&self) -> Result<ResourceUsage, DiagError> {
        let disk_mount = self.disk_mount.clone();
        tokio::task::spawn_blocking(move || sample_blocking(&disk_mount))
            .await
            .map_err(|e| DiagError::ProbeError(format!("resource sampling panicked: {e}")))?
    }
}

fn sample_blocking(disk_mount: &Path) -> Result<ResourceUsage, DiagError> {
    let mut sys = System::new();

    // CPU usage is a delta between two refreshes
    sys.refresh_cpu_usage();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let memory_used = sys.used_memory();
    let memory_total = sys.total_memory();

    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .iter()
        .find(|disk| disk.mount_point() == disk_mount)
        .ok_or_else(|| {
            DiagError::ProbeError(format!("no disk mounted at {}", disk_mount.display()))
        })?;
    let disk_total = disk.total_space();
    let disk_used = disk_total.saturating_sub(disk.available_space());

    let usage = ResourceUsage {
        cpu_pct: f64::from(sys.global_cpu_usage()),
        memory_pct: percent(memory_used, memory_total),
        disk_pct: percent(disk_used, disk_total),
    };
    debug!("Sampled resources: {:?}", usage);
    Ok(usage)
}

fn percent(used: u64, total: u64) -> f64 {
    if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
