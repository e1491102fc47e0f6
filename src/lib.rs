pub mod analyse;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod runs;

// Re-export the error type for convenience
pub use error::ProfileError;
