pub mod recorder;

pub use recorder::{HitEvent, HitRecorder};
