use clap::Parser;
use mongolog::cli::Cli;
use mongolog::runtime::{boot, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let cli = Cli::parse();
    let config = boot::boot(&cli)?;
    run::run(&config).await?;
    Ok(())
}
