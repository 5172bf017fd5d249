//! Image loading.
//!
//! Locators are fetched through an [`source::ImageSource`], decoded into premultiplied RGBA8 and
//! handed out as [`image::ImageResource`]s once a whole batch has succeeded.

/// Byte decoding into premultiplied RGBA8.
pub mod decode;
/// Decoded image handle.
pub mod image;
/// Batch preloader.
pub mod preload;
/// Where image bytes come from.
pub mod source;
