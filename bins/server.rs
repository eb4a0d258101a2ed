use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // Load .env first so RUST_LOG / LOG_FORMAT apply.
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "server", event = "logger_init", "tracing subscriber initialized");
}

/// config.toml first, then TOKIO_WORKER_THREADS; zero means "runtime default".
fn resolve_worker_threads(from_config: Option<usize>, from_env: Option<&str>) -> Option<usize> {
    from_config
        .or_else(|| from_env.and_then(|v| v.trim().parse::<usize>().ok()))
        .filter(|&w| w > 0)
}

fn main() -> std::process::ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "server",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = resolve_worker_threads(
        configs::AppConfig::load_and_validate().ok().and_then(|cfg| cfg.server.worker_threads),
        std::env::var("TOKIO_WORKER_THREADS").ok().as_deref(),
    );

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "server service starting"
    );

    rt.block_on(async move {
        let server_task = tokio::spawn(async move {
            if let Err(e) = server::run().await {
                error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                Err(e)
            } else {
                Ok(())
            }
        });

        tokio::select! {
            res = server_task => {
                match res {
                    Ok(Ok(())) => {
                        info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                        std::process::ExitCode::SUCCESS
                    }
                    Ok(Err(_)) => std::process::ExitCode::FAILURE,
                    Err(e) => {
                        error!(service = "server", event = "task_join_error", error = %e, "server task join error");
                        std::process::ExitCode::FAILURE
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!(service = "server", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                std::process::ExitCode::SUCCESS
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::resolve_worker_threads;

    #[test]
    fn zero_threads_fall_back_to_runtime_default() {
        assert_eq!(resolve_worker_threads(None, Some("0")), None);
        assert_eq!(resolve_worker_threads(Some(0), None), None);
    }

    #[test]
    fn config_wins_over_env() {
        assert_eq!(resolve_worker_threads(Some(8), Some("2")), Some(8));
        assert_eq!(resolve_worker_threads(None, Some(" 2 ")), Some(2));
        assert_eq!(resolve_worker_threads(None, Some("many")), None);
    }
}
