pub mod discovery;
pub mod error;
pub mod gzip_reader;
pub mod marker;
pub mod parse;

// Re-export commonly used types
pub use discovery::{Candidate, discover, order_chronologically, stat_candidates};
pub use error::IoError;
pub use gzip_reader::{GzipLineStream, MAX_LINE_LEN};
pub use marker::{PROCESSED_MARKER, mark_processed, marked_path};
pub use parse::{APP_DELIMITER, FIELD_DELIMITER, parse_line};
