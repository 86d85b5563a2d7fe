use foundation::ids::PointId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Reading the file or talking to the server failed.
    Io(String),
    Http { status: u16 },
    Decode(String),
    /// The worker side went away before answering.
    Disconnected,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Io(msg) => write!(f, "i/o error: {msg}"),
            FetchError::Http { status } => write!(f, "http status {status}"),
            FetchError::Decode(msg) => write!(f, "decode error: {msg}"),
            FetchError::Disconnected => write!(f, "fetch worker disconnected"),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug)]
pub struct FetchOutcome<I> {
    pub id: PointId,
    pub result: Result<I, FetchError>,
}

/// Asynchronous thumbnail source driven by the scheduler.
///
/// `start` must not block; results are collected on the render thread via
/// `poll_completed`, which keeps every cache transition on that thread.
/// Every started id must eventually come back exactly once, as an image or
/// an error.
pub trait ImageFetcher {
    type Image;

    fn start(&mut self, id: PointId);

    /// Appends every finished fetch since the last call.
    fn poll_completed(&mut self, out: &mut Vec<FetchOutcome<Self::Image>>);
}
