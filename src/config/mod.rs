mod fs_image;

pub use fs_image::{FsImage, ImageError};
