mod runner;

pub(crate) use runner::{DumpPlan, RunPlan, run_local};
