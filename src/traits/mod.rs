//! Trait definitions for Workiz operations.
//!
//! Each entity type implements the traits it supports, encapsulating
//! API differences in the implementations.

mod create;
mod get;
mod list;
mod update;

pub use create::Create;
pub(crate) use get::exactly_one;
pub use get::Get;
pub use list::{List, Scheduled};
pub use update::Update;
