//! Asset descriptors and the field vocabulary shared by the pipeline.
//!
//! A descriptor keeps its fields in a single ordered map so that pipeline steps can read and
//! write attributes they only know by name (`footer`, `media`, custom keys), while the typed
//! accessors act as views over well-known keys and apply the null-safety defaults.

mod descriptor;
pub mod fields;
mod kind;

pub use descriptor::AssetDescriptor;
pub use kind::AssetKind;
