use std::path::{Path, PathBuf};

use clap::ArgMatches;
use tracing::{info, warn};

use crate::args::WrkArgs;
use crate::config::{apply_config, load_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::ClientSettings;
use crate::requests::{RequestSource, read_request_file};

use crate::app::{DumpPlan, RunPlan};

pub(crate) fn build_plan(mut args: WrkArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    let source = resolve_source(&args)?;
    let dump = args.dump.as_ref().map(|path| DumpPlan {
        path: PathBuf::from(path),
        delimiter: args.dump_delimiter,
    });

    Ok(RunPlan {
        source,
        unique: args.unique,
        concurrency: args.concurrent.get(),
        dump,
        client: ClientSettings::from_args(&args),
        output_format: args.output_format,
    })
}

/// An existing request file selects file mode; otherwise the run repeats
/// `--url` `--requests` times.
pub(super) fn resolve_source(args: &WrkArgs) -> AppResult<RequestSource> {
    if let Some(file) = args.file.as_deref() {
        let path = Path::new(file);
        if path.exists() {
            let specs = read_request_file(path)?;
            info!("Loaded {} requests from {}", specs.len(), path.display());
            return Ok(RequestSource::List(specs));
        }
        warn!("Request file {} not found; falling back to --url", path.display());
    }

    let Some(url) = args.url.clone() else {
        tracing::error!("Missing URL (set --url or provide in config).");
        return Err(AppError::validation(ValidationError::MissingUrl));
    };

    Ok(RequestSource::Repeat {
        url,
        count: args.requests.get(),
    })
}
