pub mod cli;
pub mod color;
pub mod error;
pub mod loader;
pub mod preview;
pub mod recolor;
pub mod surface;

pub use color::{Color, Palette};
pub use error::{DecodeError, Error, FormatError, Result};
pub use loader::{
    bitmap_to_surface, clone_read_optimized, load_image, load_surface, surface_to_data_url,
    surface_to_image,
};
pub use recolor::{replace_color, replace_surface_color, PixelSource, Recolor, TransparentPolicy};
pub use surface::{CanvasSurface, Surface};
