pub(crate) mod logger;
pub(crate) mod summary_output;

pub(crate) use summary_output::print_summary;
