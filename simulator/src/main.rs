use anyhow::Context;
use clap::Parser;
use generator::profile::SimulatedSource;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use log::warn;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic robot telemetry driver and HTTP bridge")]
struct Args {
    /// Run a fixed number of offline ticks and append a summary report
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Number of ticks for the offline run
    #[arg(long, default_value_t = 1)]
    frames: usize,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Refresh period of the serve loop
    #[arg(long, default_value_t = 2000)]
    interval_ms: u64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Append a stats caption to the rendered view
    #[arg(long, default_value_t = false)]
    summary: bool,
    /// Keep the bridge alive and publish a new frame every interval
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.interval_ms, args.seed, args.summary)
    };

    let runner = Runner::new(&workflow_config)?;
    let gui_bridge = GuiBridge::new(
        runner,
        SimulatedSource::new(workflow_config.generator.clone()),
    );

    if args.offline {
        let mut report = String::new();
        let mut last_metrics = None;
        for frame in 0..args.frames.max(1) {
            let result = gui_bridge.advance().context("running offline tick")?;
            let model = &result.model;

            println!(
                "Offline tick {} -> fix {} ({}, {}), valid samples {}, draw commands {}",
                frame,
                model.map.fix.status.label(),
                model.map.fix.latitude,
                model.map.fix.longitude,
                model.stats.valid_sample_count,
                model.canvas.commands.len()
            );

            report.push_str(&format!(
                "frame={} fresh_gps={} fresh_scan={} time={} status={} lat={} lon={} valid={} min_mm={} max_mm={} commands={} stamp={}\n",
                frame,
                result.sentence_fresh,
                result.scan_fresh,
                model.map.fix.time,
                model.map.fix.status.label(),
                model.map.fix.latitude,
                model.map.fix.longitude,
                model.stats.valid_sample_count,
                model.stats.min_range_mm,
                model.stats.max_range_mm,
                model.canvas.commands.len(),
                model.stats.formatted_timestamp
            ));
            last_metrics = Some(result.metrics);
        }
        if let Some(metrics) = last_metrics {
            println!(
                "Offline run -> ticks {}, GPS fallbacks {}, scan fallbacks {}",
                metrics.ticks, metrics.sentence_failures, metrics.scan_failures
            );
        }
        gui_bridge.publish_status("Offline workflow results ready.");

        let report_path = &workflow_config.report_path;
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)
            .with_context(|| format!("opening report {}", report_path.display()))?;
        file.write_all(report.as_bytes())?;
    }

    if args.serve {
        gui_bridge.serve(gui_bind_address());
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for the refresh loop")?;
        let interval = Duration::from_millis(workflow_config.interval_ms.max(1));
        runtime.block_on(async {
            let mut ticker = tokio::time::interval(interval);
            let shutdown = signal::ctrl_c();
            tokio::pin!(shutdown);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = gui_bridge.advance() {
                            warn!("refresh tick failed: {:#}", err);
                        }
                    }
                    result = &mut shutdown => {
                        result.context("awaiting Ctrl+C to exit")?;
                        break;
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        })?;
        gui_bridge.publish_status("HTTP bridge stopped.");
    }

    Ok(())
}
