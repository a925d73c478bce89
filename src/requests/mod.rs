//! Request descriptors and the builder that produces them.
mod builder;
mod descriptor;
mod file;
mod unique;


pub use builder::{RequestPlan, RequestSource};
pub use descriptor::{RequestDescriptor, RequestSpec};
pub use file::read_request_file;
pub use unique::UNIQUE_QUERY_KEY;

pub(crate) use builder::run_builder;
