use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tracing::{error, info};
use uuid::Uuid;

use common::env::AppEnv;

#[derive(Clone, Copy, Debug)]
enum Command {
    Up,
    Down,
    Status,
}

impl Command {
    fn parse(arg: Option<&str>) -> Option<Self> {
        match arg.unwrap_or("up") {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Config file first, environment variables as fallback.
fn load_config() -> anyhow::Result<configs::AppConfig> {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(file_err) => configs::AppConfig::from_env()
            .map_err(|env_err| anyhow::anyhow!("no usable config ({file_err}); environment: {env_err}")),
    }
}

async fn run(command: Command, cfg: &configs::AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    match command {
        Command::Up => Migrator::up(&db, None).await?,
        Command::Down => Migrator::down(&db, Some(1)).await?,
        Command::Status => Migrator::status(&db).await?,
    }
    Ok(())
}

fn main() -> std::process::ExitCode {
    dotenv().ok();

    let arg = std::env::args().nth(1);
    let Some(command) = Command::parse(arg.as_deref()) else {
        eprintln!("usage: migrate [up|down|status]");
        return std::process::ExitCode::from(2);
    };

    let cfg = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            // no config to read the environment from
            common::utils::logging::init_logging_for(&AppEnv::from_env());
            error!(service = "migrate", event = "config_invalid", error = %e, "cannot load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    let app_env = AppEnv::parse(&cfg.app.env);
    common::utils::logging::init_logging_for(&app_env);

    let run_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "migrate", event = "panic", %run_id, pid, message = %info, "unhandled panic occurred");
    }));

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "migrate", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(service = "migrate", event = "start", %run_id, pid, version, env = %app_env, ?command, "migration run starting");

    rt.block_on(async move {
        tokio::select! {
            res = run(command, &cfg) => match res {
                Ok(()) => {
                    info!(service = "migrate", event = "done", %run_id, ?command, "migration run finished");
                    std::process::ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(service = "migrate", event = "run_failed", %run_id, error = %e, "migration run failed");
                    std::process::ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(service = "migrate", event = "interrupted", %run_id, "received Ctrl+C, aborting");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
