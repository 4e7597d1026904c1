//! Rediver Client - Admin API access and session management
//!
//! `ApiClient` shapes every call into `Result<T, ApiClientError>`.
//! `SessionStore` owns the admin credential and `AuthGate` decides whether
//! the console may render protected views.

pub mod client;
pub mod credential;
pub mod endpoints;
pub mod error;
pub mod gate;
pub mod session;
pub mod transport;

pub use client::{query_pairs, ApiClient, RequestOptions, API_KEY_HEADER, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
pub use credential::{CredentialStore, CredentialStoreError, FileCredentialStore, MemoryCredentialStore};
pub use endpoints::ADMIN_API_PREFIX;
pub use error::{ApiClientError, ErrorKind};
pub use gate::{AuthGate, GateState, GateVerdict, PendingCheck};
pub use session::{Principal, SessionError, SessionState, SessionStore};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// HTTP vocabulary re-exported for transports and tests.
pub mod http {
    pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    pub use reqwest::{Method, StatusCode};
}
