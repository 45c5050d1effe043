mod image_store_fs;

pub use image_store_fs::*;
