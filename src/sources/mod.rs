//! Source acquisition.
//!
//! Sources put the package sources where a build plan expects them.

pub mod git;
pub mod source;

pub use git::GitCheckout;
pub use source::Source;
