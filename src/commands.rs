use crate::cli::{LinesArgs, RunArgs};
use tracing::info;
use workpool::config::Config;
use workpool::lines::LineReader;
use workpool::service::Service;
use workpool::util::{math, strings, time};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(mut config: Config, args: RunArgs) -> Result<(), AnyError> {
    if let Some(workers) = args.workers {
        config.pool.workers = workers;
    }

    info!(
        name = %config.app.name,
        addr = %config.bind_addr(),
        tls = config.app.enable_tls,
        started_at = %time::format_rfc3339(time::now_utc())?,
        "config loaded"
    );

    let service = Service::new(config.pool.clone());
    service.start()?;

    let message = strings::join_words(&["hello", "from", "service"]);
    let sum = math::add(2, 3);
    info!(%message, sum, "demo values");

    for i in 0..args.tasks {
        service.process(&format!("demo-task-{i}")).await?;
    }
    info!(queued = service.queue_depth(), "demo tasks submitted");

    service.stop().await?;

    let snapshot = service.metrics().snapshot();
    info!(
        submitted = snapshot.tasks_submitted,
        processed = snapshot.tasks_processed,
        p50_us = snapshot.task_p50.as_micros() as u64,
        p99_us = snapshot.task_p99.as_micros() as u64,
        "service metrics"
    );

    Ok(())
}

pub fn count_lines(config: &Config, args: LinesArgs) -> Result<(), AnyError> {
    let file = std::fs::File::open(&args.path)?;
    let count = LineReader::with_max_line_bytes(file, config.io.max_line_bytes.as_usize())
        .count_lines()?;

    println!("{count}");
    Ok(())
}

pub fn show_config(config: &Config) -> Result<(), AnyError> {
    print!("{}", config.to_toml()?);
    Ok(())
}
