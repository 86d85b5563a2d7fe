//! Runs the frame loop without a window; useful for profiling loads and
//! checking a dataset plus thumbnail directory end to end.

use std::time::Duration;

use render::config::EngineConfig;
use render::map::MapView;
use scene::dataset::Dataset;
use tokio::runtime::Handle;

use crate::fetch::{DecodedImage, ThumbnailFetcher};

const FRAME_DT: f64 = 1.0 / 60.0;

pub fn run(
    dataset: Dataset,
    config: &EngineConfig,
    runtime: Handle,
    frames: u64,
    size: [f64; 2],
    focus: Option<foundation::ids::PointId>,
) {
    let fetcher = ThumbnailFetcher::new(
        runtime,
        config.thumbnails.clone(),
        |_, image: DecodedImage| [image.width, image.height],
        || {},
    );
    let mut map = MapView::new(dataset, fetcher, config, size[0], size[1]);
    if let Some(id) = focus
        && !map.focus_point(id)
    {
        tracing::warn!(%id, "focus point not found");
    }

    for _ in 0..frames {
        let frame = map.tick(FRAME_DT);
        for event in map.drain_events() {
            tracing::debug!(frame = event.frame_index, payload = ?event.payload, "map event");
        }
        tracing::trace!(
            frame = frame.frame.index,
            commands = frame.commands.len(),
            mode = ?frame.lod.mode,
            "frame"
        );
        std::thread::sleep(Duration::from_secs_f64(FRAME_DT));
    }

    let view = map.camera().current();
    tracing::info!(x = view.x, y = view.y, zoom = view.zoom, idle = map.is_idle(), "headless run finished");
    tracing::info!("{}", map.metrics().snapshot());
}
