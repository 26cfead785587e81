pub use crate::config::Options;
pub use crate::engine::{CurrentTest, Failable, Golden};
pub use crate::normalize::{normalize, NormalizeError};
pub use crate::report::{CharDiffReporter, DiffReporter, LineDiffReporter, NO_DIFFERENCES};
pub use crate::scrub::{credit_card, ulid, ulid_with, RegexScrubber, Scrubber};
pub use crate::vfs::{MemFs, OsFs, Vfs, VfsError};

pub mod combinatory;
pub mod config;
pub mod engine;
pub mod helper;
pub mod normalize;
pub mod report;
pub mod scrub;
pub mod vfs;
