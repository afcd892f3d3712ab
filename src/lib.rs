pub use crate::engine::{Engine, PipelineTrace};
pub use crate::errors::{ErrorKind, TextMathError};
pub use crate::extract::{Cluster, Extraction, OperationRecord};
pub use crate::resources::Resources;

pub mod cli;
pub mod engine;
pub mod errors;
pub mod extract;
pub mod harness;
pub mod normalize;
pub mod resources;
pub mod syntax;
