//! Thumbnail fetching on the tokio runtime.
//!
//! Each started id becomes one task: read the file or GET the URL, decode on
//! the blocking pool, convert (e.g. upload as a texture), then report back
//! over a channel that the frame loop drains.

use std::sync::Arc;
use std::sync::mpsc;

use foundation::ids::PointId;
use streaming::io::{FetchError, FetchOutcome, ImageFetcher};
use streaming::locator::{ThumbnailLocation, ThumbnailLocator};
use tokio::runtime::Handle;

/// Thumbnails are small squares; anything larger is scaled down on decode.
const MAX_THUMBNAIL_PX: u32 = 256;

/// Decoded image data (RGBA8, unpremultiplied).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

type Convert<T> = Arc<dyn Fn(PointId, DecodedImage) -> T + Send + Sync>;
type Notify = Arc<dyn Fn() + Send + Sync>;

pub struct ThumbnailFetcher<T> {
    runtime: Handle,
    client: reqwest::Client,
    locator: ThumbnailLocator,
    convert: Convert<T>,
    notify: Notify,
    tx: mpsc::Sender<FetchOutcome<T>>,
    rx: mpsc::Receiver<FetchOutcome<T>>,
}

impl<T: Send + 'static> ThumbnailFetcher<T> {
    /// `convert` runs on the blocking pool right after decoding; `notify`
    /// fires after every completion so an idle host can wake up.
    pub fn new(
        runtime: Handle,
        locator: ThumbnailLocator,
        convert: impl Fn(PointId, DecodedImage) -> T + Send + Sync + 'static,
        notify: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            runtime,
            client: reqwest::Client::new(),
            locator,
            convert: Arc::new(convert),
            notify: Arc::new(notify),
            tx,
            rx,
        }
    }
}

impl<T: Send + 'static> ImageFetcher for ThumbnailFetcher<T> {
    type Image = T;

    fn start(&mut self, id: PointId) {
        let location = self.locator.locate(id);
        let client = self.client.clone();
        let convert = Arc::clone(&self.convert);
        let notify = Arc::clone(&self.notify);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let result = match fetch_bytes(&client, &location).await {
                Ok(bytes) => tokio::task::spawn_blocking(move || {
                    decode_thumbnail(&bytes).map(|image| convert(id, image))
                })
                .await
                .unwrap_or(Err(FetchError::Disconnected)),
                Err(err) => Err(err),
            };
            if tx.send(FetchOutcome { id, result }).is_err() {
                tracing::debug!(%id, "thumbnail finished after the viewer shut down");
                return;
            }
            notify();
        });
    }

    fn poll_completed(&mut self, out: &mut Vec<FetchOutcome<T>>) {
        out.extend(self.rx.try_iter());
    }
}

async fn fetch_bytes(client: &reqwest::Client, location: &ThumbnailLocation) -> Result<Vec<u8>, FetchError> {
    match location {
        ThumbnailLocation::File(path) => tokio::fs::read(path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {e}", path.display()))),
        ThumbnailLocation::Url(url) => {
            let resp = client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Io(e.to_string()))?;
            if !resp.status().is_success() {
                return Err(FetchError::Http {
                    status: resp.status().as_u16(),
                });
            }
            let bytes = resp.bytes().await.map_err(|e| FetchError::Io(e.to_string()))?;
            Ok(bytes.to_vec())
        }
    }
}

pub fn decode_thumbnail(bytes: &[u8]) -> Result<DecodedImage, FetchError> {
    let img = image::load_from_memory(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
    let img = if img.width() > MAX_THUMBNAIL_PX || img.height() > MAX_THUMBNAIL_PX {
        img.thumbnail(MAX_THUMBNAIL_PX, MAX_THUMBNAIL_PX)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
