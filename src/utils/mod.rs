//! Utility modules shared by the passes
//!
//! - [`http_client`]: guide/playlist retrieval over HTTP or from disk
//! - [`decompression`]: gzip detection and decoding of fetched payloads
//! - [`encoding`]: charset detection for fetched text
//! - [`url`]: credential obfuscation for logs
//! - [`fs`]: intermediate paths and atomic writes

pub mod decompression;
pub mod encoding;
pub mod fs;
pub mod http_client;
pub mod url;

pub use decompression::{CompressionFormat, DecompressionService};
pub use http_client::{ContentFetcher, StandardContentFetcher};
pub use self::url::UrlUtils;
