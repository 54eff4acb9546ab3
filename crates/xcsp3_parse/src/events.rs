//! The XML event contract §6 places out of scope: a SAX-level
//! tokeniser "is assumed available" and feeds the driver three kinds
//! of event. This trait is that contract, implemented by
//! [`crate::driver::Driver`] and driven by whatever tokeniser adapter
//! the embedding crate chooses (the top `xcsp3` crate's `quick-xml`
//! adapter is one such driver; a test harness can be another, simpler
//! one, which is exactly why this crate never depends on `quick-xml`
//! itself).

use xcsp3_diagnostic::Result;

/// One XML attribute, in document order, already decoded to UTF-8.
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// The three SAX-level events a streaming XML source must deliver, in
/// document order. `characters` may be called more than once per
/// element (a tokeniser is free to chunk text however it likes); the
/// driver accumulates chunks until the matching `end_element`.
pub trait XmlEvents {
    fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>]) -> Result<()>;
    fn end_element(&mut self, name: &str) -> Result<()>;
    fn characters(&mut self, chunk: &str) -> Result<()>;
}
