use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Size, Subscription,
    Task, Theme,
};
use serde::Serialize;
use std::time::Duration;
use telemcore::lidar::Scan;
use telemcore::nmea::{GpsFix, MapMarker};
use telemcore::pipeline::{DrawSink, MarkerSink, OneShotSource, TelemetryPipeline};
use telemcore::render::{DrawCommand, RenderSurface, Rgba};

const BRIDGE_URL: &str = "http://127.0.0.1:9000";

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Robot Telemetry Monitor".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(2)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

struct Visualizer {
    config: ConfigForm,
    pipeline: Option<TelemetryPipeline>,
    map: MapPanel,
    scan_view: ScanView,
    stats_line: String,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    TelemetryFetched(FetchedTelemetry),
    ConfigFieldChanged(ConfigField, String),
    SubmitConfig,
    ConfigSubmitted(Result<String, String>),
}

#[derive(Debug, Clone, Copy)]
enum ConfigField {
    Seed,
    RangeScale,
    RangeJitter,
    Dropout,
    Description,
}

/// Outcome of one poll of the bridge; each half fails independently.
#[derive(Debug, Clone)]
struct FetchedTelemetry {
    sentence: Result<String, String>,
    scan: Result<Scan, String>,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        let surface = RenderSurface::default().with_summary(true);
        let (pipeline, status) = match TelemetryPipeline::new(surface) {
            Ok(pipeline) => (Some(pipeline), "Waiting for telemetry...".to_string()),
            Err(err) => (None, format!("Surface error: {err}")),
        };
        (
            Visualizer {
                config: ConfigForm::default(),
                pipeline,
                map: MapPanel::default(),
                scan_view: ScanView::default(),
                stats_line: "No scan yet".into(),
                status,
                history: Vec::new(),
            },
            Task::perform(fetch_telemetry(), Message::TelemetryFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_telemetry(), Message::TelemetryFetched),
            Message::TelemetryFetched(fetched) => {
                state.apply(fetched);
                Task::none()
            }
            Message::ConfigFieldChanged(field, value) => {
                state.config.update_field(field, value);
                Task::none()
            }
            Message::SubmitConfig => {
                let payload = state.config.to_payload();
                Task::perform(post_config(payload), Message::ConfigSubmitted)
            }
            Message::ConfigSubmitted(Ok(message)) => {
                state.status = message;
                state.push_history("Scenario submitted".into());
                Task::none()
            }
            Message::ConfigSubmitted(Err(err)) => {
                state.status = format!("Config error: {err}");
                Task::none()
            }
        }
    }

    fn apply(&mut self, fetched: FetchedTelemetry) {
        if let Err(err) = &fetched.sentence {
            self.push_history(format!("GPS fetch failed: {err}"));
        }
        if let Err(err) = &fetched.scan {
            self.push_history(format!("Lidar fetch failed: {err}"));
        }

        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };
        let mut source = OneShotSource::new(fetched.sentence.ok(), fetched.scan.ok());
        let frame = pipeline.tick(&mut source);
        frame.publish(&mut self.scan_view, &mut self.map);

        self.stats_line = format!(
            "{} valid returns | min {} mm | max {} mm | {}",
            frame.stats.valid_sample_count,
            frame.stats.min_range_mm,
            frame.stats.max_range_mm,
            frame.stats.formatted_timestamp
        );
        self.status = match (frame.sentence_fresh, frame.scan_fresh) {
            (true, true) => "Telemetry received".into(),
            (false, false) => "Bridge unreachable, showing last known telemetry".into(),
            _ => "Partial telemetry, stale values kept".into(),
        };
        self.push_history(format!(
            "Tick: fix {} / {} valid returns",
            frame.fix.status.label(),
            frame.stats.valid_sample_count
        ));
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let config_column = column![
            text("Simulator Config").size(26),
            text_input("Seed", &state.config.seed)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Seed, value))
                .padding(6),
            text_input("Range scale", &state.config.range_scale)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::RangeScale, value))
                .padding(6),
            text_input("Range jitter (mm)", &state.config.range_jitter_mm)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::RangeJitter, value))
                .padding(6),
            text_input("Dropout probability", &state.config.dropout)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Dropout, value))
                .padding(6),
            text_input("Description", &state.config.description)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Description, value))
                .padding(6),
            button("POST scenario")
                .on_press(Message::SubmitConfig)
                .padding(10),
            text(&state.status).size(14),
            column![
                text("Parameter definitions").size(16),
                text("Seed: deterministic PRNG seeding so scenarios replay consistently.")
                    .size(12),
                text("Range scale: multiplier on the reference rotation's ranges.").size(12),
                text("Range jitter: uniform noise added to each valid return.").size(12),
                text("Dropout: probability that a GPS or lidar fetch fails.").size(12),
                text("Description: free-text note included in the ingest log.").size(12),
            ]
            .spacing(4)
            .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let fix = &state.map.fix;
        let fix_panel = column![
            text("GPS").size(22),
            text(format!("Time: {}", display_or_dash(&fix.time))).size(14),
            text(format!(
                "Latitude: {} {}",
                display_or_dash(&fix.latitude),
                fix.lat_dir
            ))
            .size(14),
            text(format!(
                "Longitude: {} {}",
                display_or_dash(&fix.longitude),
                fix.lon_dir
            ))
            .size(14),
            text(format!("Status: {}", fix.status.label())).size(14),
            text(format!(
                "Satellites: {} | HDOP: {}",
                display_or_dash(&fix.satellites_in_view),
                display_or_dash(&fix.horizontal_dilution)
            ))
            .size(14),
            text(format!(
                "Altitude: {} m | Geoid: {} m",
                display_or_dash(&fix.altitude),
                display_or_dash(&fix.geoid_height)
            ))
            .size(14),
            text(
                state
                    .map
                    .marker
                    .as_ref()
                    .map(|marker| format!(
                        "Marker: {:.6}, {:.6}",
                        marker.latitude, marker.longitude
                    ))
                    .unwrap_or_else(|| "Marker: no position".into())
            )
            .size(14),
        ]
        .spacing(4)
        .width(Length::Fixed(300.0));

        let surface_size = state
            .pipeline
            .as_ref()
            .map(|pipeline| {
                let surface = pipeline.surface();
                Size::new(surface.width_px as f32, surface.height_px as f32)
            })
            .unwrap_or(Size::new(300.0, 300.0));
        let scan_canvas = Canvas::new(state.scan_view.clone())
            .width(Length::Fixed(surface_size.width))
            .height(Length::Fixed(surface_size.height));

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let telemetry_column = column![
            text("Telemetry").size(26),
            row![fix_panel, column![text("Lidar").size(22), scan_canvas].spacing(6)]
                .spacing(20)
                .align_y(Alignment::Start),
            text(&state.stats_line).size(14),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(140.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![config_column, telemetry_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

async fn fetch_telemetry() -> FetchedTelemetry {
    let (sentence, scan) = tokio::join!(fetch_sentence(), fetch_scan());
    FetchedTelemetry { sentence, scan }
}

async fn fetch_sentence() -> Result<String, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/gps"))
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("status {}", response.status()));
    }
    response.text().await.map_err(|e| e.to_string())
}

async fn fetch_scan() -> Result<Scan, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/lidar"))
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("status {}", response.status()));
    }
    let body = response.text().await.map_err(|e| e.to_string())?;
    Scan::from_json(&body).map_err(|e| e.to_string())
}

async fn post_config(config: ScenarioConfig) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/ingest-config"))
        .json(&config)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Scenario submitted".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Clone)]
struct ConfigForm {
    seed: String,
    range_scale: String,
    range_jitter_mm: String,
    dropout: String,
    description: String,
}

impl ConfigForm {
    fn default() -> Self {
        Self {
            seed: "312".into(),
            range_scale: "0.1".into(),
            range_jitter_mm: "50".into(),
            dropout: "0.0".into(),
            description: "Rust monitor scenario".into(),
        }
    }

    fn update_field(&mut self, field: ConfigField, value: String) {
        match field {
            ConfigField::Seed => self.seed = value,
            ConfigField::RangeScale => self.range_scale = value,
            ConfigField::RangeJitter => self.range_jitter_mm = value,
            ConfigField::Dropout => self.dropout = value,
            ConfigField::Description => self.description = value,
        }
    }

    fn to_payload(&self) -> ScenarioConfig {
        ScenarioConfig {
            seed: self.seed.parse().ok(),
            range_scale: self.range_scale.parse().ok(),
            range_jitter_mm: self.range_jitter_mm.parse().ok(),
            dropout: self.dropout.parse().ok(),
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ScenarioConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    range_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    range_jitter_mm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dropout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

/// Map-marker adapter: holds what a map widget would pin.
#[derive(Debug, Clone, Default)]
struct MapPanel {
    fix: GpsFix,
    marker: Option<MapMarker>,
}

impl MarkerSink for MapPanel {
    fn place(&mut self, fix: &GpsFix, marker: Option<&MapMarker>) {
        self.fix = fix.clone();
        self.marker = marker.cloned();
    }
}

/// Canvas adapter: replays draw commands onto an iced frame.
#[derive(Debug, Clone, Default)]
struct ScanView {
    commands: Vec<DrawCommand>,
}

impl DrawSink for ScanView {
    fn draw(&mut self, commands: &[DrawCommand]) {
        self.commands = commands.to_vec();
    }
}

fn to_color(color: &Rgba) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn to_point(x: f64, y: f64) -> Point {
    Point::new(x as f32, y as f32)
}

impl canvas::Program<Message> for ScanView {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        for command in &self.commands {
            match command {
                DrawCommand::Clear { width, height } => {
                    frame.fill_rectangle(
                        Point::ORIGIN,
                        Size::new(*width as f32, *height as f32),
                        Color::from_rgb(0.02, 0.02, 0.04),
                    );
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    stroke,
                } => {
                    let path = Path::circle(to_point(center.x, center.y), *radius as f32);
                    frame.stroke(
                        &path,
                        Stroke::default()
                            .with_width(stroke.width as f32)
                            .with_color(to_color(&stroke.color)),
                    );
                }
                DrawCommand::Line { from, to, stroke } => {
                    let path = Path::line(to_point(from.x, from.y), to_point(to.x, to.y));
                    frame.stroke(
                        &path,
                        Stroke::default()
                            .with_width(stroke.width as f32)
                            .with_color(to_color(&stroke.color)),
                    );
                }
                DrawCommand::FilledPoint {
                    center,
                    radius,
                    color,
                } => {
                    let path = Path::circle(to_point(center.x, center.y), *radius as f32);
                    frame.fill(&path, to_color(color));
                }
                DrawCommand::Text {
                    position,
                    content,
                    size,
                    color,
                } => {
                    // Commands anchor text at the baseline; iced anchors at the top.
                    frame.fill_text(canvas::Text {
                        content: content.clone(),
                        position: to_point(position.x, position.y - f64::from(*size)),
                        color: to_color(color),
                        size: Pixels(*size),
                        ..canvas::Text::default()
                    });
                }
            }
        }

        vec![frame.into_geometry()]
    }
}
