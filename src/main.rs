use clap::Parser;
use route_subnets::logging::init_logging;
use route_subnets::output::print_summary;
use route_subnets::{CliArgs, Config, Pipeline};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = CliArgs::parse();
    init_logging(&args.log_config)?;
    log::info!("#Start main() config={}", args.config.display());

    let config = Config::load(&args.config)?;
    let pipeline = Pipeline::new(config)?;
    let rows = pipeline.run(args.no_cache).await?;
    print_summary(&rows);

    log::info!("#End main()");
    Ok(())
}
