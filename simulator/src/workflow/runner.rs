use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::config::WorkflowConfig;
use anyhow::{anyhow, Context};
use std::sync::{Arc, Mutex};
use telemcore::pipeline::{TelemetryPipeline, TelemetrySource};
use telemcore::telemetry::Metrics;

#[derive(Debug)]
pub struct WorkflowResult {
    pub model: VisualizationModel,
    pub sentence_fresh: bool,
    pub scan_fresh: bool,
    pub metrics: Metrics,
}

/// Shared handle on the telemetry pipeline; clones tick the same state.
#[derive(Clone)]
pub struct Runner {
    pipeline: Arc<Mutex<TelemetryPipeline>>,
}

impl Runner {
    pub fn new(config: &WorkflowConfig) -> anyhow::Result<Self> {
        let pipeline = TelemetryPipeline::new(config.surface.clone())
            .context("building telemetry pipeline")?;
        Ok(Self {
            pipeline: Arc::new(Mutex::new(pipeline)),
        })
    }

    pub fn execute<S>(&self, source: &mut S) -> anyhow::Result<WorkflowResult>
    where
        S: TelemetrySource + ?Sized,
    {
        let mut pipeline = self
            .pipeline
            .lock()
            .map_err(|_| anyhow!("telemetry pipeline lock poisoned"))?;
        let frame = pipeline.tick(source);
        let metrics = pipeline.metrics();
        drop(pipeline);

        let mut model = VisualizationModel {
            stats: frame.stats.clone(),
            ..Default::default()
        };
        frame.publish(&mut model.canvas, &mut model.map);

        if !frame.sentence_fresh {
            model.notes.push("GPS fetch failed, showing previous fix".into());
        }
        if !frame.scan_fresh {
            model.notes.push("lidar fetch failed, showing previous scan".into());
        }
        model.notes.push(format!(
            "{} valid samples, range {}-{} mm",
            frame.stats.valid_sample_count, frame.stats.min_range_mm, frame.stats.max_range_mm
        ));

        Ok(WorkflowResult {
            model,
            sentence_fresh: frame.sentence_fresh,
            scan_fresh: frame.scan_fresh,
            metrics,
        })
    }
}
