pub mod context;
pub mod error;
pub mod file;
pub mod file_set;
pub mod node;
pub mod parser;
pub mod result;
pub mod syntax;

pub use context::{ParseContext, VariableRecord};
pub use error::{ConfigError, Result};
pub use file::ConfigFile;
pub use file_set::ConfigFileSet;
pub use node::{ConfigNode, NodeKind};
pub use syntax::Syntax;
