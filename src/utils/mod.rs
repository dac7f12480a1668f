//! Shared utilities.

pub mod image;

pub use image::{decode_image, load_image, load_images_batch};
