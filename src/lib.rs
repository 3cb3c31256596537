pub mod audit;
pub mod config;
pub mod error;
pub mod ioc;
pub mod matcher;
pub mod model;
pub mod output;
pub mod parser;
pub mod walker;

pub use audit::Auditor;
pub use config::Config;
pub use error::{FeedError, ParseError};
pub use ioc::{FeedSource, IocDatabase};
pub use model::{Hit, ManifestFile, ManifestKind, ScanReport};
