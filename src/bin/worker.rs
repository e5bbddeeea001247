use clap::{Arg, ArgAction, Command};
use std::time::Duration;
use urpeer_backend::{
    config::Config, db, init_tracing, notification_worker, notifications::WorkOutcome, open_queue,
};

fn cli() -> Command {
    Command::new("worker")
        .about("Delivers queued notification emails")
        .arg(
            Arg::new("once")
                .long("once")
                .help("Drain the queue once and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("poll-interval-ms")
                .long("poll-interval-ms")
                .value_name("MS")
                .help("Sleep between polls of an empty queue")
                .value_parser(clap::value_parser!(u64))
                .default_value("1000"),
        )
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    if config.redis_url.is_none() {
        tracing::error!("REDIS_URL must be set for the standalone worker");
        std::process::exit(1);
    }

    let worker = match db::build_pool(&config.database())
        .and_then(|pool| Ok(notification_worker(&config, open_queue(&config)?, pool)))
    {
        Ok(worker) => worker,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start worker");
            std::process::exit(1);
        }
    };

    let poll_interval = Duration::from_millis(
        matches
            .get_one::<u64>("poll-interval-ms")
            .copied()
            .unwrap_or(1000),
    );

    if !matches.get_flag("once") {
        worker.run(poll_interval).await;
        return;
    }

    let mut processed = 0u32;
    loop {
        match worker.process_next().await {
            Ok(WorkOutcome::Idle) => break,
            Ok(_) => processed += 1,
            Err(e) => {
                tracing::error!(error = %e, "Worker stopped on error");
                std::process::exit(1);
            }
        }
    }
    tracing::info!(processed, "Queue drained");
}
