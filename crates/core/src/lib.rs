//! Domain types for the gengtu image-generation client.
//!
//! Everything in this crate is pure: no I/O, no async. The HTTP side
//! lives in `gengtu-client`, which drives the [`state::PageState`]
//! reducer defined here.

pub mod artifact;
pub mod aspect;
pub mod auth;
pub mod error;
pub mod generation;
pub mod history;
pub mod session;
pub mod state;
pub mod types;
