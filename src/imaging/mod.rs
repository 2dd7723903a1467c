//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Save original** | decode + re-encode at the configured quality |
//! | **Aspect resize** | bounded `resize_exact` |
//! | **Fit (squared) thumbnail** | center `crop_imm` + shrink-only resize |
//! | **EXIF** | `kamadak-exif` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ExifData, ImageBackend, SavedImage};
pub use calculations::{FitGeometry, calculate_bounded_dimensions, calculate_fit_geometry};
pub use operations::{ThumbnailPlan, create_thumbnail, plan_thumbnail, save_original};
pub use params::{FitParams, Quality, ResizeParams, SaveParams};
pub use rust_backend::RustBackend;
