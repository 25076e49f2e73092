//! XMLTV guide handling
//!
//! - [`repair`]: raw-text ampersand repair for display names
//! - [`rewriter`]: streaming channel icon rewrite engine
//! - [`cross_reference`]: `id -> icon` lookup from a finished guide

pub mod cross_reference;
pub mod repair;
pub mod rewriter;

pub use cross_reference::{collect_channel_icons, load_cross_reference};
pub use repair::{repair_ampersands, repair_display_names};
pub use rewriter::{ChannelInfo, GuideRewrite, rewrite_channel_icons, scan_channels};
