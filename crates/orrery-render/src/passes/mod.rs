//! The built-in passes, in pipeline order.

mod background;
mod cel;
mod corona;
mod geometry;
mod star_surface;

pub use background::{BackgroundPass, StarPoint, generate_stars};
pub use cel::{CelPass, OutlineConfig, band};
pub use corona::CoronaPass;
pub use geometry::{GeometryPass, sphere_uv};
pub use star_surface::{StarSurfaceConfig, StarSurfacePass};
