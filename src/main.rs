// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::fs;
use std::io::{self, Write as _};
use std::sync::Arc;

use anyhow::{anyhow, Context as _};
use futures::stream::StreamExt;
use parking_lot::Mutex;
use structopt::StructOpt;
use tokio::task::spawn_blocking;
use tokio::time;
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod camera;
mod error;
mod export;
mod frame;
mod image_buffer;
mod render;
mod settings;
mod temperature;
mod util;

use crate::camera::{Camera, MockSensor, Recording, RepeatMode, ThermalSensor};
use crate::render::{Plotter, Renderer};
use crate::settings::{Args, Command, ExportSettings, Settings};
use crate::temperature::SharedRange;
use crate::util::flatten_join_result;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Build a camera around `sensor`, then apply any range overrides from the command line.
///
/// An override that would leave an invalid range is logged and ignored.
fn create_camera(
    settings: &Settings,
    args: &Args,
    sensor: Box<dyn ThermalSensor>,
) -> anyhow::Result<Camera> {
    debug!(
        "Configured temperature range {:#} - {:#}",
        settings.render.lower_limit, settings.render.upper_limit
    );
    let range = settings.render.range()?;
    let renderer = Renderer::try_from(&settings.render)?;
    let plotter = Plotter::new(settings.render.plot_colors);
    let camera = Camera::new(sensor, SharedRange::new(range), renderer, plotter);
    if let Err(err) = camera.override_temperature_range(args.min, args.max) {
        warn!("Ignoring temperature range from the command line: {}", err);
    }
    let range = camera.temperature_range();
    info!(
        min = range.min(),
        max = range.max(),
        "Rendering temperature range"
    );
    Ok(camera)
}

fn connected_camera(settings: &Settings, args: &Args) -> anyhow::Result<Camera> {
    let mut camera = create_camera(settings, args, settings.camera.create_sensor()?)?;
    if camera.connect() {
        Ok(camera)
    } else {
        Err(anyhow!("Unable to connect to the thermal sensor"))
    }
}

/// Capture on a fixed interval until the configured number of captures have been taken,
/// returning how many succeeded.
///
/// Failed captures are logged and skipped. If the sensor has dropped off, reconnecting is
/// attempted on the next tick.
async fn watch(camera: Camera, export: ExportSettings) -> anyhow::Result<usize> {
    let period = export.interval_duration()?;
    let camera = Arc::new(Mutex::new(camera));
    let export = Arc::new(export);
    let limit = export.max_captures.map_or(usize::MAX, |count| count as usize);
    let mut ticks = IntervalStream::new(time::interval(period))
        .take(limit)
        .enumerate();
    info!(
        directory = %export.directory.display(),
        interval = ?period,
        "Watching thermal sensor"
    );
    let mut captured = 0;
    while let Some((index, _)) = ticks.next().await {
        let camera = Arc::clone(&camera);
        let base = export.capture_base(index as u32);
        let join_result = spawn_blocking(move || {
            let mut camera = camera.lock();
            if !camera.is_connected() && !camera.connect() {
                return Err(anyhow!("Thermal sensor is not connected"));
            }
            camera.capture(&base)
        })
        .await;
        match flatten_join_result(join_result) {
            Ok(paths) => {
                captured += 1;
                debug!(?paths, index, "Finished capture");
            }
            Err(err) => warn!(index, "Capture failed: {:?}", err),
        }
    }
    info!(captured, "Finished watching");
    Ok(captured)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut settings = Settings::load(&args.config_path)?;
    settings.apply_args(&args)?;
    debug!(?settings, "Loaded settings");
    match &args.command {
        Command::Status => {
            let sensor = settings.camera.create_sensor()?;
            let mut camera = create_camera(&settings, &args, sensor)?;
            camera.connect();
            println!("{}", serde_json::to_string(&camera.status())?);
            camera.disconnect();
        }
        Command::Raw => {
            let sensor = settings.camera.create_sensor()?;
            let mut camera = create_camera(&settings, &args, sensor)?;
            camera.connect();
            println!("{}", serde_json::to_string(&camera.raw_frame())?);
            camera.disconnect();
        }
        Command::Image { output } => {
            let mut camera = connected_camera(&settings, &args)?;
            let png = camera.capture_image()?;
            camera.disconnect();
            match output {
                Some(path) => fs::write(path, &png)
                    .with_context(|| format!("Unable to write {}", path.display()))?,
                None => {
                    let stdout = io::stdout();
                    let mut stdout = stdout.lock();
                    stdout.write_all(&png)?;
                    stdout.flush()?;
                }
            }
        }
        Command::Capture { output } => {
            let mut camera = connected_camera(&settings, &args)?;
            let paths = camera.capture(output)?;
            println!("{}", serde_json::to_string(&paths)?);
            camera.disconnect();
        }
        Command::Watch { .. } => {
            let camera = connected_camera(&settings, &args)?;
            watch(camera, settings.export.clone()).await?;
        }
        Command::Render {
            input,
            index,
            output,
        } => {
            let recording = Recording::from_path(input)?;
            let frame = recording.frame(*index)?.clone();
            let sensor = MockSensor::new(vec![frame], RepeatMode::None);
            let mut camera = create_camera(&settings, &args, Box::new(sensor))?;
            camera.connect();
            let paths = camera.capture(output)?;
            println!("{}", serde_json::to_string(&paths)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    run(Args::from_args()).await
}
