//! Provide shared, pure vocabulary and run configuration for the chasqui test bridge.
//!
//! This crate is intentionally small. It contains the pieces that both the filter
//! frontend and the adapter proper need to agree on:
//! - the host filter property vocabulary ([`props`]) and grammar symbols ([`symbols`]),
//! - the engine/host outcome vocabulary and the mapping between them ([`outcome`]),
//! - the engine-assigned test identity used as a join key ([`identity`]),
//! - the read-only run settings bundle ([`settings`]).
//!
//! ## Notes
//! - Vocabulary modules are **pure**: no IO, no global state. Only [`settings`]
//!   touches the filesystem, and only to load a settings file once.

pub mod identity;
pub mod outcome;
pub mod props;
pub mod settings;
pub mod symbols;
