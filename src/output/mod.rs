//! Output of aggregated prefixes.
//!
//! This module handles everything written to disk or terminal:
//! - [`prefix_list`] - Plain prefix lists and legacy-cased copies
//! - [`routeros`] - RouterOS address-list scripts
//! - [`terminal`] - End-of-run summary

mod prefix_list;
mod routeros;
mod terminal;

pub use prefix_list::{copy_legacy, legacy_copy_path, write_prefix_list};
pub use routeros::RouterOsScript;
pub use terminal::{format_field, format_summary_row, print_summary, GroupStatus, SummaryRow};
