use crate::app::{RunPlan, run_local};
use crate::error::AppResult;
use crate::system::print_summary;

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    let output_format = plan.output_format;
    let statistics = run_local(plan).await?;
    print_summary(&statistics, output_format)
}
