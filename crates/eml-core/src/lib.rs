//! # EML Core
//!
//! Assembly of Ecological Metadata Language records from relational survey data.
//!
//! Given a data package identifier, [`EmlService::produce_eml`] resolves the package's single
//! occurrence submission, its survey and parent project, gathers the dependent rows (funding,
//! geometry, focal taxa, IUCN actions, partnerships) and the system constants, and renders an
//! EML 2.2.0 document.
//!
//! - [`repository`]: the read contract over the relational store
//! - [`fetch`]: cardinality and identifier rules applied on top of it
//! - [`resolver`]: system constants with a `Not Supplied` fallback
//! - [`coverage`], [`funding`]: pure builders for the repeated sub-structures
//! - [`assembler`]: the two-phase gather and the pure record assembly
//! - [`snapshot`]: a YAML-backed repository for offline runs
//!
//! **No transport concerns**: HTTP handlers and database drivers live outside this crate.

pub mod assembler;
pub mod config;
pub mod constants;
pub mod coverage;
pub mod error;
pub mod fetch;
pub mod funding;
pub mod pipeline;
pub mod repository;
pub mod resolver;
pub mod snapshot;

#[cfg(test)]
mod test_support;

pub use config::{indent_from_env_value, resolve_snapshot_path, CoreConfig};
pub use error::{EmlError, EmlResult};
pub use pipeline::EmlService;
pub use repository::{EmlRepository, StoreError, StoreResult};
pub use resolver::{ConstantResolver, SystemConstants};
pub use snapshot::{Snapshot, SnapshotStore};
