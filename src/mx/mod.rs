//! DNS MX resolution.
//!
//! [`check_mx`] performs a synchronous lookup with the system resolver and
//! returns an [`MxStatus`]. The [`LookupMx`] trait is the seam the verifier
//! uses, so any resolver (or a test double) can be injected.

mod error;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use resolver::{LookupMx, SystemResolver, check_mx, resolve_with};
pub use types::{MxRecord, MxStatus};

#[cfg(test)]
pub(crate) mod tests;
