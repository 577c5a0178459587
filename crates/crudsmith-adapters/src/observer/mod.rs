//! Pipeline observers.

mod recording;
mod traced;

pub use recording::RecordingObserver;
pub use traced::TracingObserver;
