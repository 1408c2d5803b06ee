use std::path::Path;

use crate::config::Config;

pub fn config_output(config_path: &Path, config: &Config) -> serde_json::Value {
    let universe: Vec<String> = config.universe().iter().map(|c| c.to_string()).collect();
    serde_json::json!({
        "config_file": config_path.display().to_string(),
        "config_file_exists": config_path.exists(),
        "universe": universe,
        "request": config.request,
        "source": config.source,
        "output": config.output,
    })
}
