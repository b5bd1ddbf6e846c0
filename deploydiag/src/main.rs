//! deploydiag - Entry Point
//!
//! Point-in-time diagnostics for a deployed web application: deployment log
//! analysis, live health checks, readiness and improvement reports.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tracing::{error, info, warn};

use deploydiag::analysis::aggregator::{HealthAggregator, Probes};
use deploydiag::analysis::deployment::build_report;
use deploydiag::analysis::improvement::build_improvement;
use deploydiag::analysis::readiness::build_readiness;
use deploydiag::analysis::recommend::RecommendationEngine;
use deploydiag::analysis::snapshot::SnapshotBuilder;
use deploydiag::analysis::sources::{load_log_text, load_metrics, scan_error_logs};
use deploydiag::config::settings::Settings;
use deploydiag::filesys::dir::Dir;
use deploydiag::logs::init_logging;
use deploydiag::models::deployment::DeploymentStatus;
use deploydiag::models::health::{HealthReport, OverallHealth};
use deploydiag::parse::parse_log;
use deploydiag::probes::{
    HttpProbe, ReqwestProbe, ResourceProbe, SecurityProbe, SystemResourceProbe,
    TlsCertificateProbe,
};
use deploydiag::reports::markdown::render_deployment;
use deploydiag::reports::ReportStore;
use deploydiag::utils::version_info;

const DEFAULT_CONFIG_PATH: &str = "/etc/deploydiag/settings.json";

const USAGE: &str = "\
Usage: deploydiag [--config=<settings.json>] [--no-save] <command>

Commands:
  --health               Check resources, services, connectivity and certificates
  --deploy-log[=<path>]  Analyze a deployment log
  --readiness            Build the deployment readiness report
  --improve              Build the continuous-improvement report
  --version              Print version information";

// Reports go to stdout; logs and verdict lines go to stderr.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        println!("{}", serde_json::to_string_pretty(&version_info())?);
        return Ok(());
    }

    let config_path = cli_args
        .get("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH);
    let settings = Settings::load(config_path)
        .await
        .context("loading settings")?;

    let _log_guard = match init_logging(settings.log_options()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    info!("deploydiag {} starting", env!("CARGO_PKG_VERSION"));
    let app = App {
        engine: RecommendationEngine::new(settings.recommendation_thresholds),
        store: (!cli_args.contains_key("no-save"))
            .then(|| ReportStore::new(&settings.paths.report_dir)),
        settings,
    };

    if cli_args.contains_key("health") {
        app.health().await?;
    } else if let Some(path) = cli_args.get("deploy-log") {
        let path = match path.as_str() {
            "true" => app.settings.paths.deployment_log.clone(),
            other => PathBuf::from(other),
        };
        app.deployment(path).await?;
    } else if cli_args.contains_key("readiness") {
        app.readiness().await?;
    } else if cli_args.contains_key("improve") {
        app.improvement().await?;
    } else {
        println!("{USAGE}");
    }

    Ok(())
}

struct App {
    settings: Settings,
    engine: RecommendationEngine,
    store: Option<ReportStore>,
}

impl App {
    fn probes(&self) -> Probes {
        let resources: Arc<dyn ResourceProbe> =
            Arc::new(SystemResourceProbe::new(&self.settings.probes.disk_mount));
        let http: Option<Arc<dyn HttpProbe>> = match ReqwestProbe::new() {
            Ok(probe) => Some(Arc::new(probe)),
            Err(e) => {
                error!("HTTP client unavailable: {}", e);
                None
            }
        };
        let security: Arc<dyn SecurityProbe> = Arc::new(TlsCertificateProbe::new());

        Probes {
            resources: Some(resources),
            http,
            security: Some(security),
        }
    }

    async fn collect_health(&self) -> HealthReport {
        HealthAggregator::new(self.settings.aggregator_options(), self.probes())
            .collect()
            .await
    }

    async fn health(&self) -> anyhow::Result<()> {
        let report = self.collect_health().await;
        print_json(&report)?;
        eprintln!("Overall health: {}", paint_health(report.overall_health));
        self.save_json("system_health", &report).await;
        Ok(())
    }

    async fn deployment(&self, path: PathBuf) -> anyhow::Result<()> {
        let log = load_log_text(&path).await;
        let report = build_report(parse_log(&log.value));
        let metrics = load_metrics(&self.settings.paths.metrics_files).await;

        let snapshot = SnapshotBuilder::new()
            .metrics(&metrics.value)
            .deployment(&report)
            .build();
        let recommendations = self.engine.recommend(&snapshot);

        let document = render_deployment(&report, &recommendations);
        println!("{document}");
        eprintln!("Deployment status: {}", paint_deployment(report.status));

        let at = Local::now();
        if let Some(store) = &self.store {
            if let Err(e) = store.save_json("deployment_analysis", at, &report).await {
                error!("Unable to save deployment analysis: {}", e);
            }
            if let Err(e) = store.save_markdown("deployment_report", at, &document).await {
                error!("Unable to save deployment report: {}", e);
            }
        }
        Ok(())
    }

    async fn readiness(&self) -> anyhow::Result<()> {
        let paths = &self.settings.paths;
        let log = load_log_text(&paths.deployment_log).await;
        let metrics = load_metrics(&paths.metrics_files).await;
        let health = self.collect_health().await;

        let report = build_readiness(
            Local::now(),
            &log.value,
            &metrics.value,
            Some(&health),
            &self.settings.components,
            &self.engine,
        );
        print_json(&report)?;
        self.save_json("deployment_readiness", &report).await;
        Ok(())
    }

    async fn improvement(&self) -> anyhow::Result<()> {
        let paths = &self.settings.paths;
        let metrics = load_metrics(&paths.metrics_files).await;
        let errors = scan_error_logs(&Dir::new(&paths.log_dir)).await;
        if !metrics.is_complete() || !errors.is_complete() {
            warn!(
                "Improvement report is partial: {} source(s) missing",
                metrics.missing.len() + errors.missing.len()
            );
        }
        let health = self.collect_health().await;

        let report = build_improvement(
            Local::now(),
            metrics.value,
            errors.value,
            Some(&health),
            &self.engine,
        );
        print_json(&report)?;
        self.save_json("continuous_improvement", &report).await;
        Ok(())
    }

    async fn save_json<T: Serialize>(&self, prefix: &str, report: &T) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save_json(prefix, Local::now(), report).await {
            error!("Unable to save {} report: {}", prefix, e);
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn paint_health(health: OverallHealth) -> ColoredString {
    let label = health.to_string();
    match health {
        OverallHealth::Excellent => label.green().bold(),
        OverallHealth::Good => label.green(),
        OverallHealth::NeedsAttention => label.yellow().bold(),
        OverallHealth::Critical => label.red().bold(),
    }
}

fn paint_deployment(status: DeploymentStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        DeploymentStatus::Success => label.green().bold(),
        DeploymentStatus::PartialFailure => label.yellow().bold(),
        DeploymentStatus::CriticalFailure => label.red().bold(),
    }
}
