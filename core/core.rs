pub mod diagnostics;
pub mod file_finder;
pub mod guard;
pub mod manager;
pub mod processor;
pub mod stripper;

pub use diagnostics::{Diagnostics, NullDiagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use file_finder::{
    CliArgs, Command, CompletionArgs, DecommentArgs, InfoArgs, find_files, language_for_path,
};
pub use guard::{GuardError, MAX_INPUT_CHARS, guarded_replace, validate};
pub use manager::{CommentManager, Granularity};
pub use processor::{FileOutcome, ProcessedFileResult, process_files, process_text};
pub use stripper::{BraceDialect, Capability, Strategy, StrategyFailure, StripError};

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Security validation failed: {0}")]
    Guard(#[from] GuardError),

    #[error("File processing error in {path}: {message}")]
    Processing { path: String, message: String },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
