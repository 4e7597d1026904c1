//! Rediver Core - Admin API Types
//!
//! Pass-through data structures for the platform admin API. No I/O lives
//! here; the client and console crates depend on this one.

pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod pagination;
pub mod requests;
pub mod secret;

pub use entities::*;
pub use enums::*;
pub use error::{ApiErrorBody, ValidationError};
pub use identity::*;
pub use pagination::{total_pages, Page, Pagination};
pub use requests::*;
pub use secret::{Credential, CredentialError, RevealedSecret};
