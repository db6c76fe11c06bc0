// src/main.rs

use devrun::{cli, run_command};

#[tokio::main]
async fn main() {
    let args = cli::parse_run();
    let code = run_command(args).await;
    std::process::exit(code);
}
