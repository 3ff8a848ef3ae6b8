//! Crop widget adapter.

mod geometry;
mod image_crop_widget;

pub use image_crop_widget::ImageCropWidget;
