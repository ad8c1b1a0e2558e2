//! Color space conversions used by the restoration stage.

mod lab;


pub use lab::{
    lab_to_linear_rgb, lab_to_rgb8, linear_rgb_to_lab, linear_to_srgb, rgb8_to_lab,
    srgb8_to_linear_table, srgb_to_linear, Lab,
};
