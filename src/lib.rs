//! Toner-saving PDF conversion: finds predominantly dark rectangular regions
//! on each rasterized page and inverts only those regions.

pub mod config;
pub mod error;
pub mod invert;
pub mod pdf;
pub mod pipeline;
pub mod region;
pub mod render;
