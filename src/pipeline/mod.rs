//! Document passes and the run orchestrator
//!
//! Each pass owns its document I/O and report writing; the pure rewriting
//! lives in [`crate::xmltv`] and [`crate::m3u`].

pub mod fix_pass;
pub mod m3u_pass;
pub mod orchestrator;
pub mod xml_pass;

pub use fix_pass::apply_specific_fixes;
pub use m3u_pass::{M3uPassResult, run_m3u_pass};
pub use orchestrator::{DocumentState, Orchestrator, RunSummary};
pub use xml_pass::{XmlPassResult, run_xml_pass};
