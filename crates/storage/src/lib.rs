//! Object storage backends for the stockflow pipeline.
//!
//! - [`S3ObjectStore`]: Amazon S3 through the AWS SDK
//! - [`LocalObjectStore`]: a directory tree, one sub-directory per bucket

pub mod local;
pub mod s3;

pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;
