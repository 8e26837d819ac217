//! The store APIs implement the gateway's storage semantics on top of any backend that satisfies the
//! [`crate::traits`] contracts. Handlers in the server crate only ever talk to these APIs.
mod data_api;
mod profile_api;

pub use data_api::{DataApi, MAX_PAGE_SIZE};
pub use profile_api::ProfileApi;
