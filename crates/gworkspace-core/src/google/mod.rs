//! Google API Client Module
//!
//! Thin REST wrappers over Google Workspace APIs (People, Gmail, Drive,
//! Calendar, Tasks). Each wrapper issues one request per operation through
//! the authenticated [`GoogleClient`].

pub mod calendar;
pub mod client;
pub mod common;
pub mod drive;
pub mod gmail;
pub mod people;
pub mod service;
pub mod tasks;

pub use calendar::CalendarApi;
pub use client::GoogleClient;
pub use drive::DriveApi;
pub use gmail::GmailApi;
pub use people::PeopleApi;
pub use service::GoogleServices;
pub use tasks::TasksApi;

/// Macro to implement the standard Google API wrapper constructor pattern.
/// Each API struct wraps a `GoogleClient` and an endpoint root, and provides
/// `new(client)` for the public endpoint plus `with_base_url` for any other.
macro_rules! google_api_wrapper {
    ($name:ident, $base:expr) => {
        impl $name {
            /// Create a new API wrapper around an authenticated client
            pub fn new(client: crate::google::client::GoogleClient) -> Self {
                Self::with_base_url(client, $base)
            }

            /// Wrapper whose requests go to `base_url` instead
            pub fn with_base_url(
                client: crate::google::client::GoogleClient,
                base_url: impl Into<String>,
            ) -> Self {
                Self {
                    client,
                    base_url: base_url.into().trim_end_matches('/').to_string(),
                }
            }
        }
    };
}

pub(crate) use google_api_wrapper;
