//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use shop_core::ShopConfig;

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Shop configuration.
    pub config: ShopConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = match config_path {
            Some(path) => ShopConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path))?,
            // Try to find config in current directory or parent directories
            None => match Self::find_config(&cwd) {
                Some(path) => ShopConfig::load(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?,
                None => ShopConfig::default(),
            },
        };
        output.debug(&format!(
            "shipping {} / tax rate {}",
            config.pricing.shipping_flat, config.pricing.tax_rate
        ));

        Ok(Self { config, output, cwd })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let config_names = ["shop.toml", ".shop.toml", "shop.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Read and parse a JSON input file.
    pub fn read_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resolved = self.resolve_path(path);
        let content = std::fs::read_to_string(&resolved)
            .with_context(|| format!("Failed to read {}", resolved.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", resolved.display()))
    }
}
