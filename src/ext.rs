//! Collaborator contracts the auth-code core calls through.
//!
//! Request parameters, the user session, schema metadata, and record mutation all belong to
//! the host application. The core only needs the narrow traits below; the bundled
//! [`MemorySession`], [`QueryParams`], and [`StaticSchema`] cover tests and simple hosts.
//! Record mutation has no bundled implementation.

pub mod action;
pub mod request;
pub mod schema;
pub mod session;

pub use action::*;
pub use request::*;
pub use schema::*;
pub use session::*;
