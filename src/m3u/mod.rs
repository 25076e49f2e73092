//! M3U playlist handling

pub mod rewriter;

pub use rewriter::{
    ExtinfAttributes, LogoSources, PlaylistEntry, PlaylistRewrite, ResolvedLogo, parse_extinf,
    rewrite_playlist, set_tvg_logo,
};
