/// Image codec module
///
/// This module handles:
/// - Data URL encoding and size estimates (data_url.rs)
/// - Target dimension clamping (dimensions.rs)
/// - Format-specific encoding (encode.rs)
/// - The decode → resize → encode pipeline (compress.rs)

pub mod compress;
pub mod data_url;
pub mod dimensions;
pub mod encode;

pub use compress::{compress, Compression};
pub use data_url::DataUrl;
