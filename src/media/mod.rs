//! Video assets on disk and how they are served.

pub mod quality;
pub mod range;
pub mod resolver;
pub mod stream;

pub use quality::Quality;
pub use range::{parse_range, ByteRange};
pub use resolver::{validate_id, MediaResolver, QualityInfo, VideoInfo, VideoMetadata};
pub use stream::{MediaFile, StreamPlan};
