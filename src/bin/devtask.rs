// src/bin/devtask.rs

use devrun::{cli, logging, run_tasks};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("devtask error: {err}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse_tasks();
    logging::init_logging(args.log_level)?;
    run_tasks(args).await?;
    Ok(())
}
