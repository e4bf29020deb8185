use anyhow::{bail, Context, Result};

use crate::config;

pub fn run(api_url: String, project_ref: Option<String>) -> Result<()> {
    let root = config::project_root()?;
    let cfg_path = config::config_path(&root);

    if cfg_path.exists() {
        bail!(
            "dbpass is already initialized in this directory. \
             To reinitialize, delete .dbpass/ first."
        );
    }
    if api_url.trim().is_empty() {
        bail!("--api-url must not be empty.");
    }

    let cfg = config::Config::default_new(api_url, project_ref);
    config::write(&root, &cfg).context("Failed to write config")?;

    println!("Initialized {}.", cfg_path.display());
    println!();
    println!("  1. Provide a token:   export {}=...", config::ACCESS_TOKEN_ENV);
    println!("  2. Check access:      dbpass status");
    println!("  3. Reset a password:  dbpass reset");
    if cfg.project_ref.is_none() {
        println!();
        println!("No default project set. Pass --project-ref or add project_ref to config.toml.");
    }

    Ok(())
}
