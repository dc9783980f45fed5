//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod search;

pub(crate) use build::BuildArgs;
pub(crate) use search::SearchArgs;
