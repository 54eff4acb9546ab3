//! Compact-notation scanner, prefix-expression reader, and streaming
//! XML driver for XCSP3 instances (§4.3, §4.2.1, §4.6), plus the
//! manager/dispatcher (§4.4) that turns a finalised constraint IR node
//! into a typed callback-bank invocation.
//!
//! This crate deliberately has no dependency on an XML tokeniser: it
//! consumes events through [`events::XmlEvents`], and the top `xcsp3`
//! crate supplies the `quick-xml` adapter that feeds it.

pub mod callback;
pub mod condition;
pub mod config;
pub mod dispatcher;
pub mod driver;
pub mod events;
pub mod expr_parser;
pub mod scanner;
pub mod validate;

pub use callback::{CallbackBank, Tuple};
pub use config::ParserConfig;
pub use driver::Driver;
pub use events::{Attribute, XmlEvents};
pub use validate::validate_known_variables;

use xcsp3_diagnostic::Result;
use xcsp3_ir::{Instance, InstanceType};

/// Drives `bank` to completion from `source`, which must deliver a
/// well-formed `<instance>` document's events in order (§6). Returns
/// the fully parsed and unfolded [`Instance`] once the closing
/// `</instance>` tag has been processed.
pub fn parse_with<S>(kind: InstanceType, config: ParserConfig, bank: &mut dyn CallbackBank, drive: S) -> Result<Instance>
where
    S: FnOnce(&mut Driver<'_>) -> Result<()>,
{
    let mut driver = Driver::new(kind, config, bank);
    drive(&mut driver)?;
    Ok(driver.into_instance())
}
