//! Orrery application: the simulation clock, the explicit frame scheduler
//! and the host glue (PNG frame output, on-disk textures, platform
//! directories, startup from config).

mod assets;
mod clock;
mod output;
pub mod platform;
mod scheduler;
mod setup;

pub use assets::{DirectoryAssetResolver, load_image};
pub use clock::{MAX_FRAME_TIME, MAX_TIME_SCALE, MIN_TIME_SCALE, SimulationClock};
pub use output::{PngSequence, encode_png};
pub use scheduler::{FrameReport, FrameScheduler};
pub use setup::{AppError, Startup, build_scheduler, camera_for, load_catalog, pipeline_settings};
