use std::path::PathBuf;

use tracing::info;

use crate::args::{DumpDelimiter, OutputFormat};
use crate::error::AppResult;
use crate::http::{ClientSettings, build_client};
use crate::metrics::RunStatistics;
use crate::pipeline::run_pipeline;
use crate::requests::{RequestPlan, RequestSource};
use crate::sinks::open_trace_sink;

pub(crate) struct DumpPlan {
    pub(crate) path: PathBuf,
    pub(crate) delimiter: DumpDelimiter,
}

/// Everything a local run needs, resolved from CLI flags and config.
pub(crate) struct RunPlan {
    pub(crate) source: RequestSource,
    pub(crate) unique: bool,
    pub(crate) concurrency: usize,
    pub(crate) dump: Option<DumpPlan>,
    pub(crate) client: ClientSettings,
    pub(crate) output_format: OutputFormat,
}

/// Validates the plan, opens the trace dump and runs the pipeline.
///
/// Every fatal setup error surfaces here before any request is sent.
pub(crate) async fn run_local(plan: RunPlan) -> AppResult<RunStatistics> {
    let RunPlan {
        source,
        unique,
        concurrency,
        dump,
        client,
        ..
    } = plan;

    let request_plan = RequestPlan::prepare(source, unique)?;
    let trace_sink = match dump {
        Some(dump) => {
            info!("Writing request trace to {}", dump.path.display());
            Some(open_trace_sink(&dump.path, dump.delimiter)?)
        }
        None => None,
    };
    let client = build_client(&client)?;

    let statistics = run_pipeline(request_plan, client, concurrency, trace_sink).await?;
    info!(
        "Run finished: {} completed, {} errors in {:?}",
        statistics.completed_count, statistics.error_count, statistics.wall_clock_total
    );
    Ok(statistics)
}
