//! Data domain: reading historical patient records and their outcome labels.

pub mod domain;
pub mod repo_fs;
pub mod service;

pub use domain::{DataRepo, Dataset, DatasetId, RawCase};
pub use repo_fs::{FsDataRepo, MemDataRepo};
