mod app;
pub use app::*;

pub mod input;

mod window_resizing;
pub use window_resizing::clamp_to_surface_limits;
