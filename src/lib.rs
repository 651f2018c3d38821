#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset;
pub mod conditions;
pub mod config;
pub mod error;
pub mod host;
pub mod loader;
pub mod manifest;
pub mod pipeline;

pub use asset::{AssetDescriptor, AssetKind};
pub use conditions::ConditionRegistry;
pub use config::ThemeEnvironment;
pub use error::{LoaderError, LoaderResult};
pub use host::{AssetHost, RecordingHost};
pub use loader::{AssetLoader, LoadReport, SkipReason};
pub use manifest::Manifest;
pub use pipeline::Pipeline;
