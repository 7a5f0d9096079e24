//! Workiz API model types.

mod customer;
mod job;
mod lead;
mod query;
mod team;
pub(crate) mod wire;

use serde::Serialize;

pub use customer::*;
pub use job::*;
pub use lead::*;
pub use query::*;
pub use team::*;

/// A POST body with the account secret alongside the payload fields.
#[derive(Debug, Serialize)]
pub(crate) struct Authed<'a, T> {
    pub auth_secret: &'a str,
    #[serde(flatten)]
    pub inner: T,
}
