#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Remote repository validation
//!
//! Checks that every artifact of a repository is either absent from, or
//! byte-identical to, its counterpart on a set of mirrors:
//!
//! 1. mirrors are probed once and dead ones dropped for the run,
//! 2. candidate artifacts are enumerated from a directory or a manifest,
//! 3. one task per artifact resolves the origin fingerprint and compares it
//!    with each live mirror under the active [`Policy`],
//! 4. failures are funnelled into a shared [`ValidatorContext`].

mod artifacts;
mod context;
mod filter;
mod mirrors;
mod policy;
mod walker;

pub use artifacts::Repository;
pub use context::{ValidationError, ValidatorContext};
pub use filter::{
    has_artifact_extension, ExceptionFilter, FileFilter, IgnoreRule, PatternFileFilter,
    ARTIFACT_EXTENSIONS,
};
pub use mirrors::{default_mirrors, CURATED_MIRRORS};
pub use policy::{CheckTarget, Policy};
pub use walker::{
    MirrorValidator, MirrorValidatorBuilder, DEFAULT_MAX_CONCURRENT_TASKS, DEFAULT_TIMEOUT,
};
