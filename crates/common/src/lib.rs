//! Wire protocol and error types shared across the paste client crates.

pub mod error;
pub mod protocol;

pub use error::SubmitError;
pub use protocol::{PasteForm, PasteId};
