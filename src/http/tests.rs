use std::future::Future;
use std::time::Duration;

use reqwest::{Method, Url};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::execution::describe_error;
use super::mock_server::{MOCK_BODY, MockServer, always_ok, refused_addr};
use super::pool::supervise;
use super::*;
use crate::error::{AppError, AppResult, PipelineError};
use crate::metrics::RequestResult;
use crate::requests::RequestDescriptor;

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn descriptor(id: u64, url: &str, method: Method, body: Option<&str>) -> AppResult<RequestDescriptor> {
    let target_url = Url::parse(url)
        .map_err(|err| AppError::validation(format!("Bad test url {}: {}", url, err)))?;
    Ok(RequestDescriptor {
        sequence_id: id,
        target_url,
        method,
        body: body.map(str::to_owned),
    })
}

fn mock_len() -> u64 {
    u64::try_from(MOCK_BODY.len()).unwrap_or(u64::MAX)
}

fn service_unavailable(_target: &str) -> u16 {
    503
}

#[test]
fn build_client_accepts_timeouts() -> AppResult<()> {
    let settings = ClientSettings {
        request_timeout: Some(Duration::from_secs(3)),
        connect_timeout: Some(Duration::from_millis(250)),
    };
    build_client(&settings)?;
    build_client(&ClientSettings::default())?;
    Ok(())
}

#[test]
fn execute_descriptor_counts_body_bytes() -> AppResult<()> {
    run_async_test(async {
        let server = MockServer::start(always_ok).await?;
        let client = build_client(&ClientSettings::default())?;

        let request = descriptor(0, &server.url("/status"), Method::GET, None)?;
        let (status, bytes) = execute_descriptor(&client, request)
            .await
            .map_err(|err| AppError::validation(format!("Request failed: {}", err)))?;
        if status != 200 || bytes != mock_len() {
            return Err(AppError::validation(format!(
                "Unexpected outcome: status {} bytes {}",
                status, bytes
            )));
        }
        Ok(())
    })
}

#[test]
fn execute_descriptor_sends_method_and_body() -> AppResult<()> {
    run_async_test(async {
        let server = MockServer::start(always_ok).await?;
        let client = build_client(&ClientSettings::default())?;

        let request = descriptor(0, &server.url("/submit"), Method::POST, Some("payload"))?;
        execute_descriptor(&client, request)
            .await
            .map_err(|err| AppError::validation(format!("Request failed: {}", err)))?;

        let seen = server.seen()?;
        let first = seen
            .first()
            .ok_or_else(|| AppError::validation("Mock saw no request"))?;
        if first.method != "POST" || first.target != "/submit" || first.body != "payload" {
            return Err(AppError::validation(format!("Unexpected request: {:?}", first)));
        }
        Ok(())
    })
}

#[test]
fn server_errors_are_not_transport_failures() -> AppResult<()> {
    run_async_test(async {
        let server = MockServer::start(service_unavailable).await?;
        let client = build_client(&ClientSettings::default())?;

        let request = descriptor(0, &server.url("/"), Method::GET, None)?;
        match execute_descriptor(&client, request).await {
            Ok((503, _)) => Ok(()),
            Ok((status, _)) => Err(AppError::validation(format!("Unexpected status {}", status))),
            Err(err) => Err(AppError::validation(format!("Unexpected failure: {}", err))),
        }
    })
}

#[test]
fn connection_refused_is_transport_failure() -> AppResult<()> {
    run_async_test(async {
        let addr = refused_addr()?;
        let client = build_client(&ClientSettings::default())?;

        let request = descriptor(0, &format!("http://{}/", addr), Method::GET, None)?;
        match execute_descriptor(&client, request).await {
            Ok(outcome) => Err(AppError::validation(format!(
                "Expected failure, got {:?}",
                outcome
            ))),
            Err(err) => {
                if describe_error(&err).is_empty() {
                    return Err(AppError::validation("Expected an error message"));
                }
                Ok(())
            }
        }
    })
}

#[test]
fn pool_closes_results_once_dispatch_is_drained() -> AppResult<()> {
    run_async_test(async {
        let server = MockServer::start(always_ok).await?;
        let client = build_client(&ClientSettings::default())?;
        let (dispatch_tx, dispatch_rx) = flume::bounded(1);
        let (results_tx, mut results_rx) = mpsc::channel::<RequestResult>(3);

        let supervisor = spawn_worker_pool(3, &client, dispatch_rx, results_tx);

        let url = server.url("/pool");
        let sender = tokio::spawn(async move {
            for id in 0..6 {
                let request = descriptor(id, &url, Method::GET, None)?;
                dispatch_tx
                    .send_async(request)
                    .await
                    .map_err(|err| AppError::validation(format!("Dispatch failed: {}", err)))?;
            }
            Ok::<(), AppError>(())
        });

        let mut ids = Vec::new();
        while let Some(result) = results_rx.recv().await {
            if result.worker_id >= 3 {
                return Err(AppError::validation(format!(
                    "Worker id out of range: {}",
                    result.worker_id
                )));
            }
            ids.push(result.sequence_id);
        }
        sender.await??;
        supervisor.await??;

        ids.sort_unstable();
        if ids != vec![0, 1, 2, 3, 4, 5] {
            return Err(AppError::validation(format!("Unexpected ids: {:?}", ids)));
        }
        Ok(())
    })
}

#[test]
fn pool_with_no_requests_closes_immediately() -> AppResult<()> {
    run_async_test(async {
        let client = build_client(&ClientSettings::default())?;
        let (dispatch_tx, dispatch_rx) = flume::bounded::<RequestDescriptor>(1);
        let (results_tx, mut results_rx) = mpsc::channel::<RequestResult>(2);

        let supervisor = spawn_worker_pool(2, &client, dispatch_rx, results_tx);
        drop(dispatch_tx);

        if results_rx.recv().await.is_some() {
            return Err(AppError::validation("Expected no results"));
        }
        supervisor.await??;
        Ok(())
    })
}

#[test]
fn supervisor_reports_panicked_worker_and_closes_results() -> AppResult<()> {
    run_async_test(async {
        let (results_tx, mut results_rx) = mpsc::channel::<RequestResult>(2);
        let healthy = tokio::spawn(async { 3_u64 });
        let crashed: JoinHandle<u64> =
            tokio::spawn(async { std::panic::resume_unwind(Box::new("worker crashed")) });

        let outcome = supervise(vec![healthy, crashed], results_tx).await;
        if results_rx.recv().await.is_some() {
            return Err(AppError::validation("Result channel should be closed"));
        }
        match outcome {
            Err(AppError::Pipeline(PipelineError::WorkerFailed { source })) if source.is_panic() => {
                Ok(())
            }
            Err(err) => Err(AppError::validation(format!("Unexpected error: {}", err))),
            Ok(()) => Err(AppError::validation("Expected WorkerFailed")),
        }
    })
}
