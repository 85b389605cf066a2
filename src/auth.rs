//! Auth-code domain: validated identifiers, expiry expressions, and the code model.

pub mod code;
pub mod expiry;
pub mod id;

pub use code::{record::*, row::*, secret::*, target::*};
pub use expiry::*;
pub use id::*;
