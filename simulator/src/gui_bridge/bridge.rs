use crate::generator::profile::{GeneratorConfig, SimulatedSource};
use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::{Runner, WorkflowResult};
use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, RwLock},
    thread,
};
use telemcore::lidar::Scan;
use telemcore::nmea::checksum_matches;
use telemcore::pipeline::OneShotSource;
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// Body accepted by `POST /ingest`; either half may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub sentence: Option<String>,
    #[serde(default)]
    pub scan: Option<Scan>,
}

#[derive(Debug, Clone, Default)]
struct BridgeState {
    model: VisualizationModel,
    sentence: String,
    scan: Scan,
}

/// Hosts the telemetry HTTP endpoints and keeps the latest published frame.
#[derive(Clone)]
pub struct GuiBridge {
    state: Arc<RwLock<BridgeState>>,
    source: Arc<Mutex<SimulatedSource>>,
    runner: Runner,
}

impl GuiBridge {
    pub fn new(runner: Runner, source: SimulatedSource) -> Self {
        Self {
            state: Arc::new(RwLock::new(BridgeState::default())),
            source: Arc::new(Mutex::new(source)),
            runner,
        }
    }

    /// Pulls one frame from the simulated source, runs it and publishes the result.
    pub fn advance(&self) -> Result<WorkflowResult> {
        let mut source = self
            .source
            .lock()
            .map_err(|_| anyhow!("simulated source lock poisoned"))?;
        let result = self.runner.execute(&mut *source)?;
        let sentence = source.last_sentence().map(str::to_owned);
        let scan = source.last_scan().cloned();
        drop(source);

        self.publish_raw(sentence, scan)?;
        self.publish(&result.model)?;
        Ok(result)
    }

    /// Runs an externally supplied sentence and/or scan through the pipeline.
    pub fn ingest(&self, request: IngestRequest) -> Result<WorkflowResult> {
        let mut notes = Vec::new();
        if let Some(sentence) = request.sentence.as_deref() {
            if checksum_matches(sentence) == Some(false) {
                warn!("ingested sentence fails checksum: {}", sentence);
                notes.push("ingested sentence failed its checksum".to_string());
            }
        }

        let mut source = OneShotSource::new(request.sentence.clone(), request.scan.clone());
        let mut result = self.runner.execute(&mut source)?;
        result.model.notes.extend(notes);

        self.publish_raw(request.sentence, request.scan)?;
        self.publish(&result.model)?;
        Ok(result)
    }

    /// Reseeds the simulated source and publishes the first frame it produces.
    pub fn reconfigure(&self, config: GeneratorConfig) -> Result<WorkflowResult> {
        config.validate().context("rejecting generator config")?;
        {
            let mut source = self
                .source
                .lock()
                .map_err(|_| anyhow!("simulated source lock poisoned"))?;
            source.reconfigure(config);
            info!("[GUI] generator reseeded with seed {}", source.config().seed);
        }
        self.advance()
    }

    pub fn publish(&self, model: &VisualizationModel) -> Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow!("bridge state lock poisoned"))?;
        guard.model = model.clone();
        info!(
            "[GUI] draw commands: {}, valid samples: {}, fix: {}",
            model.canvas.commands.len(),
            model.stats.valid_sample_count,
            model.map.fix.status.label()
        );
        Ok(())
    }

    fn publish_raw(&self, sentence: Option<String>, scan: Option<Scan>) -> Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow!("bridge state lock poisoned"))?;
        if let Some(sentence) = sentence {
            guard.sentence = sentence;
        }
        if let Some(scan) = scan {
            guard.scan = scan;
        }
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    fn read_state<T>(&self, view: impl FnOnce(&BridgeState) -> T) -> Result<T> {
        let guard = self
            .state
            .read()
            .map_err(|_| anyhow!("bridge state lock poisoned"))?;
        Ok(view(&guard))
    }

    /// The HTTP endpoints, bound to this bridge's shared state.
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let bridge_filter = {
            let bridge = self.clone();
            warp::any().map(move || bridge.clone())
        };

        let payload_route = warp::path("payload")
            .and(warp::get())
            .and(bridge_filter.clone())
            .and_then(|bridge: GuiBridge| async move {
                bridge
                    .read_state(|state| warp::reply::json(&state.model))
                    .map_err(|_| warp::reject::custom(WarpError))
            });

        let gps_route = warp::path("gps")
            .and(warp::get())
            .and(bridge_filter.clone())
            .and_then(|bridge: GuiBridge| async move {
                bridge
                    .read_state(|state| state.sentence.clone())
                    .map_err(|_| warp::reject::custom(WarpError))
            });

        let lidar_route = warp::path("lidar")
            .and(warp::get())
            .and(bridge_filter.clone())
            .and_then(|bridge: GuiBridge| async move {
                bridge
                    .read_state(|state| warp::reply::json(&state.scan))
                    .map_err(|_| warp::reject::custom(WarpError))
            });

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(bridge_filter.clone())
            .and_then(|request: IngestRequest, bridge: GuiBridge| async move {
                match bridge.ingest(request) {
                    Ok(result) => Ok::<_, warp::Rejection>(warp::reply::with_status(
                        warp::reply::json(&json!({
                            "status": "ok",
                            "valid_samples": result.model.stats.valid_sample_count,
                            "notes": result.model.notes,
                        })),
                        StatusCode::OK,
                    )),
                    Err(err) => {
                        error!("ingest error: {}", err);
                        Err(warp::reject::custom(WarpError))
                    }
                }
            });

        let config_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(bridge_filter)
            .and_then(|config: GeneratorConfig, bridge: GuiBridge| async move {
                let scenario = config.scenario.clone();
                let description = config.description.clone().unwrap_or_default();
                let reply = match bridge.reconfigure(config) {
                    Ok(result) => {
                        if let Some(name) = scenario {
                            info!(
                                "[GUI] Scenario {} -> {} valid samples",
                                name, result.model.stats.valid_sample_count
                            );
                        }
                        warp::reply::with_status(
                            warp::reply::json(&json!({
                                "status": "ok",
                                "valid_samples": result.model.stats.valid_sample_count,
                                "description": description,
                            })),
                            StatusCode::OK,
                        )
                    }
                    Err(err) => {
                        error!("ingest-config error: {:#}", err);
                        warp::reply::with_status(
                            warp::reply::json(&json!({
                                "status": "error",
                                "message": format!("{:#}", err),
                            })),
                            StatusCode::BAD_REQUEST,
                        )
                    }
                };
                Ok::<_, warp::Rejection>(reply)
            });

        payload_route
            .or(gps_route)
            .or(lidar_route)
            .or(ingest_route)
            .or(config_route)
    }

    /// Starts the HTTP endpoints on a background thread.
    pub fn serve(&self, address: SocketAddr) {
        let routes = self.routes();
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(routes).try_bind_ephemeral(address) {
                    Ok((bound, server)) => {
                        info!("[GUI] bridge listening on http://{}", bound);
                        server.await;
                    }
                    Err(err) => error!("failed to bind bridge on {}: {}", address, err),
                }
            });
        });
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state.read().unwrap().model.clone()
    }

    #[cfg(test)]
    pub fn raw_snapshot(&self) -> (String, Scan) {
        let state = self.state.read().unwrap();
        (state.sentence.clone(), state.scan.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;
    use telemcore::lidar::ScanSample;
    use telemcore::nmea::FixStatus;

    fn bridge() -> GuiBridge {
        let cfg = WorkflowConfig::from_args(2000, 5, false);
        let runner = Runner::new(&cfg).unwrap();
        GuiBridge::new(runner, SimulatedSource::new(cfg.generator))
    }

    #[test]
    fn advance_publishes_model_and_raw_telemetry() {
        let gui = bridge();
        let result = gui.advance().unwrap();
        assert_eq!(
            gui.snapshot().stats.valid_sample_count,
            result.model.stats.valid_sample_count
        );
        let (sentence, scan) = gui.raw_snapshot();
        assert!(sentence.starts_with("$GNGGA,"));
        assert_eq!(scan.sample_count, 16);
    }

    #[test]
    fn ingest_flags_bad_checksum_but_still_decodes() {
        let gui = bridge();
        let request = IngestRequest {
            sentence: Some(
                "$GNGGA,023634.00,4004.73871635,N,11614.19729418,E,1,28,0.7,61.0988,M,-8.4923,M,,*00"
                    .into(),
            ),
            scan: Some(Scan::from_samples(vec![ScanSample::new(0.0, 1200, 90)], 0)),
        };
        let result = gui.ingest(request).unwrap();
        assert_eq!(result.model.map.fix.status, FixStatus::Fix);
        assert_eq!(result.model.stats.valid_sample_count, 1);
        assert!(result
            .model
            .notes
            .iter()
            .any(|note| note.contains("checksum")));
        assert_eq!(gui.raw_snapshot().1.samples.len(), 1);
    }

    #[test]
    fn reconfigure_restarts_generator() {
        let gui = bridge();
        gui.advance().unwrap();
        let result = gui
            .reconfigure(GeneratorConfig {
                range_scale: 0.01,
                range_jitter_mm: 0,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(result.model.stats.max_range_mm, 435);
    }

    #[test]
    fn reconfigure_rejects_oversized_settings_and_keeps_serving() {
        let gui = bridge();
        let err = gui
            .reconfigure(GeneratorConfig {
                range_scale: 1e300,
                ..Default::default()
            })
            .unwrap_err();
        assert!(format!("{err:#}").contains("range_scale"));
        assert!(gui
            .reconfigure(GeneratorConfig {
                position_jitter_deg: 1e308,
                ..Default::default()
            })
            .is_err());

        let result = gui.advance().unwrap();
        assert_eq!(result.model.stats.valid_sample_count, 14);
    }

    #[tokio::test]
    async fn ingest_route_runs_one_tick() {
        let gui = bridge();
        let body = json!({
            "sentence": "$GNGGA,023634.00,4004.73871635,N,11614.19729418,E,1,28,0.7,61.0988,M,-8.4923,M,,*58",
            "scan": {"N": 1, "points": [{"angle": 45.0, "distance_mm": 257, "intensity": 153}]},
        });
        let response = warp::test::request()
            .method("POST")
            .path("/ingest")
            .json(&body)
            .reply(&gui.routes())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let reply: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(reply["valid_samples"], 1);

        let gps = warp::test::request()
            .method("GET")
            .path("/gps")
            .reply(&gui.routes())
            .await;
        assert!(std::str::from_utf8(gps.body()).unwrap().starts_with("$GNGGA,023634.00"));

        let lidar = warp::test::request()
            .method("GET")
            .path("/lidar")
            .reply(&gui.routes())
            .await;
        let scan = Scan::from_json(std::str::from_utf8(lidar.body()).unwrap()).unwrap();
        assert_eq!(scan.samples.len(), 1);
    }

    #[tokio::test]
    async fn ingest_route_rejects_malformed_body() {
        let gui = bridge();
        let response = warp::test::request()
            .method("POST")
            .path("/ingest")
            .header("content-type", "application/json")
            .body("{\"scan\": 7")
            .reply(&gui.routes())
            .await;
        assert!(response.status().is_client_error());
        assert!(gui.raw_snapshot().0.is_empty());
    }

    #[tokio::test]
    async fn config_route_reports_bad_request_for_invalid_settings() {
        let gui = bridge();
        let response = warp::test::request()
            .method("POST")
            .path("/ingest-config")
            .json(&json!({"range_scale": 1e300}))
            .reply(&gui.routes())
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(gui.advance().is_ok());
    }
}
