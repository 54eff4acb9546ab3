//! Top-level XCSP3 crate: wires the streaming driver in
//! [`xcsp3_parse`] to a concrete `quick-xml` tokeniser and ships two
//! example [`xcsp3_parse::CallbackBank`] sinks plus a small CLI.
//!
//! Parsing a document end to end is a single call:
//!
//! ```no_run
//! use xcsp3::demos::SummaryBank;
//!
//! let xml = std::fs::read_to_string("instance.xml").unwrap();
//! let mut bank = SummaryBank::new();
//! let instance = xcsp3::parse_document(&xml, xcsp3_parse::ParserConfig::default(), &mut bank).unwrap();
//! println!("{}", bank.report());
//! println!("{} constraints retained", instance.constraints.len());
//! ```

pub mod demos;
pub mod tracing_setup;
mod xml_source;

pub use xml_source::{parse_document, parse_file};
