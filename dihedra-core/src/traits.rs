//! Small traits shared by the structure and I/O crates.

/// One-line, human-readable digest for logs.
pub trait Summarizable {
    fn summary(&self) -> String;
}

/// A single headline score, e.g. the TM-score of an alignment.
pub trait Scored {
    fn score(&self) -> f64;
}
