pub mod image;
pub mod paint;
pub mod raster;

pub use image::{ImageError, from_data_url, to_data_url};
pub use paint::StrokeStyle;
pub use raster::Raster;
