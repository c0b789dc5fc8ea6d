use anyhow::Result;
use swisseo_vhi::{Config, StacClient, build_timelines, export_timelines, materialize_assets};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    let client = StacClient::new(&config.api_url)?;

    // A failed fetch or download is logged and the run continues: the
    // aggregation still works against whatever is already cached locally.
    // Storage and database failures stay fatal.
    if let Err(e) = fetch_and_cache(&client, &config) {
        if e.is_request() {
            eprintln!("An error occurred: {}", e);
        } else {
            return Err(e.into());
        }
    }

    println!("Creating timeline tables in DuckDB...");
    build_timelines(&config.output_dir, &config.database)?;

    println!("Exporting timeline tables to CSV files...");
    export_timelines(&config.database, &config.output_dir)?;

    Ok(())
}

fn fetch_and_cache(client: &StacClient, config: &Config) -> swisseo_vhi::Result<()> {
    let items = client.fetch_all_items(&config.collection)?;
    materialize_assets(client, &items, &config.output_dir)
}
