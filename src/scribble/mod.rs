pub mod input;
pub mod model;
pub mod overlay;
pub mod surface;
pub mod toolbar;

pub use overlay::{Cursor, ScribbleOverlay};
pub use surface::{ContainerMetrics, Damage, DirtyRect, RasterSurface, MAX_SURFACE_SIDE};
