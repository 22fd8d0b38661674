//! Print the JSON Schema of the adapter configuration.
//!
//! Hosts can validate their configuration files against it before handing
//! them to `AdapterConfig::from_json`.

use scorm_rte::schemars::schema_for;
use scorm_rte::AdapterConfig;

fn main() -> anyhow::Result<()> {
    let schema = schema_for!(AdapterConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
