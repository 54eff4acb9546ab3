//! Example [`xcsp3_parse::CallbackBank`] sinks, grounded on the two
//! reference callback banks shipped with the original C++ parser:
//! `XCSP3SummaryCallbacks.h` and `XCSP3PrintCallbacks.h`. Neither is
//! required to use the parser — a caller can always implement
//! `CallbackBank` directly — but both make good smoke tests for the
//! CLI and a starting point for a real sink.

pub mod print;
pub mod summary;

pub use print::PrintBank;
pub use summary::SummaryBank;
