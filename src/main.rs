mod config;
mod flows;
mod generate;
mod session;
mod wizard;

use anyhow::Result;
use config::Config;
use session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            eprintln!("Please fix 'config.yml', or delete it to run with defaults.");
            return Err(e);
        }
    };

    let flow = flows::flow_for(&config.flow)?;
    let client = generate::create_generation_client(&config)?;

    let mut session = Session::new(flow, client);
    session.run().await?;

    Ok(())
}
