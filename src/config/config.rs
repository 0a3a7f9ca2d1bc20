use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ErrorContext, FundsError, FundsResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub network: Option<String>,
    pub rpc_api_key: Option<String>,
    pub rpc_url: Option<String>,
    pub contract_address: Option<String>,
    pub signer_private_key: Option<String>,
    pub government_address: Option<String>,
    pub gas_limit: Option<u64>,
    pub appwrite_endpoint: Option<String>,
    pub appwrite_project: Option<String>,
    pub appwrite_api_key: Option<String>,
    pub database_id: Option<String>,
    pub projects_collection_id: Option<String>,
}

/// Resolved document-store settings; only built when every required id is present.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorSettings {
    pub endpoint: String,
    pub project: String,
    pub api_key: Option<String>,
    pub database_id: String,
    pub collection_id: String,
}

/// Keys accepted by `config set`, in the order `config show` prints them.
pub const CONFIG_KEYS: &[&str] = &[
    "network",
    "rpc_api_key",
    "rpc_url",
    "contract_address",
    "signer_private_key",
    "government_address",
    "gas_limit",
    "appwrite_endpoint",
    "appwrite_project",
    "appwrite_api_key",
    "database_id",
    "projects_collection_id",
];

const SECRET_KEYS: &[&str] = &["rpc_api_key", "signer_private_key", "appwrite_api_key"];

impl Config {
    /// Overlay `FUNDS_*` environment variables on top of file values.
    pub fn apply_env(mut self) -> FundsResult<Self> {
        self.apply_vars(|name| env::var(name).ok())?;
        Ok(self)
    }

    fn apply_vars<F>(&mut self, lookup: F) -> FundsResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pairs = [
            (ENV_NETWORK, "network"),
            (ENV_RPC_API_KEY, "rpc_api_key"),
            (ENV_RPC_URL, "rpc_url"),
            (ENV_CONTRACT_ADDRESS, "contract_address"),
            (ENV_SIGNER_PRIVATE_KEY, "signer_private_key"),
            (ENV_GOVERNMENT_ADDRESS, "government_address"),
            (ENV_GAS_LIMIT, "gas_limit"),
            (ENV_APPWRITE_ENDPOINT, "appwrite_endpoint"),
            (ENV_APPWRITE_PROJECT, "appwrite_project"),
            (ENV_APPWRITE_API_KEY, "appwrite_api_key"),
            (ENV_DATABASE_ID, "database_id"),
            (ENV_PROJECTS_COLLECTION_ID, "projects_collection_id"),
        ];

        for (var, key) in pairs {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                self.set(key, &value)?;
            }
        }
        Ok(())
    }

    /// Set a config value by its snake_case key.
    pub fn set(&mut self, key: &str, value: &str) -> FundsResult<()> {
        let value = value.trim().to_string();
        match key {
            "network" => self.network = Some(value),
            "rpc_api_key" => self.rpc_api_key = Some(value),
            "rpc_url" => self.rpc_url = Some(value),
            "contract_address" => self.contract_address = Some(value),
            "signer_private_key" => self.signer_private_key = Some(value),
            "government_address" => self.government_address = Some(value),
            "gas_limit" => {
                let limit = value.parse::<u64>().map_err(|_| {
                    FundsError::ConfigError(format!("gas_limit must be an integer, got '{}'", value))
                })?;
                self.gas_limit = Some(limit);
            }
            "appwrite_endpoint" => self.appwrite_endpoint = Some(value),
            "appwrite_project" => self.appwrite_project = Some(value),
            "appwrite_api_key" => self.appwrite_api_key = Some(value),
            "database_id" => self.database_id = Some(value),
            "projects_collection_id" => self.projects_collection_id = Some(value),
            other => {
                return Err(FundsError::ConfigError(format!(
                    "Unknown config key '{}'. Valid keys: {}",
                    other,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        match key {
            "network" => self.network.clone(),
            "rpc_api_key" => self.rpc_api_key.clone(),
            "rpc_url" => self.rpc_url.clone(),
            "contract_address" => self.contract_address.clone(),
            "signer_private_key" => self.signer_private_key.clone(),
            "government_address" => self.government_address.clone(),
            "gas_limit" => self.gas_limit.map(|g| g.to_string()),
            "appwrite_endpoint" => self.appwrite_endpoint.clone(),
            "appwrite_project" => self.appwrite_project.clone(),
            "appwrite_api_key" => self.appwrite_api_key.clone(),
            "database_id" => self.database_id.clone(),
            "projects_collection_id" => self.projects_collection_id.clone(),
            _ => None,
        }
    }

    /// Key/value pairs for display, with secrets masked.
    pub fn display_entries(&self) -> Vec<(&'static str, Option<String>)> {
        CONFIG_KEYS
            .iter()
            .map(|key| {
                let value = self.get(key).map(|v| {
                    if SECRET_KEYS.contains(key) {
                        mask_secret(&v)
                    } else {
                        v
                    }
                });
                (*key, value)
            })
            .collect()
    }

    pub fn network(&self) -> &str {
        self.network.as_deref().unwrap_or(DEFAULT_NETWORK)
    }

    /// Explicit RPC URL, or the Infura URL for the configured network.
    pub fn rpc_url(&self) -> FundsResult<String> {
        if let Some(url) = &self.rpc_url {
            return Ok(url.clone());
        }
        let key = self
            .rpc_api_key
            .as_ref()
            .ok_or_else(|| FundsError::ConfigMissing("rpc_api_key".to_string()))?;
        Ok(format!("https://{}.infura.io/v3/{}", self.network(), key))
    }

    pub fn contract_address(&self) -> FundsResult<Address> {
        let raw = self
            .contract_address
            .as_ref()
            .ok_or_else(|| FundsError::ConfigMissing("contract_address".to_string()))?;
        parse_address_setting("contract_address", raw)
    }

    pub fn signer_private_key(&self) -> FundsResult<&str> {
        self.signer_private_key
            .as_deref()
            .ok_or_else(|| FundsError::ConfigMissing("signer_private_key".to_string()))
    }

    pub fn government_address(&self) -> FundsResult<Option<Address>> {
        self.government_address
            .as_ref()
            .map(|raw| parse_address_setting("government_address", raw))
            .transpose()
    }

    pub fn mirror_settings(&self) -> Option<MirrorSettings> {
        Some(MirrorSettings {
            endpoint: self
                .appwrite_endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_APPWRITE_ENDPOINT.to_string()),
            project: self.appwrite_project.clone()?,
            api_key: self.appwrite_api_key.clone(),
            database_id: self.database_id.clone()?,
            collection_id: self.projects_collection_id.clone()?,
        })
    }
}

fn parse_address_setting(key: &str, raw: &str) -> FundsResult<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| FundsError::ConfigError(format!("{} is not a valid address: {}", key, e)))
}

pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn config_path() -> FundsResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| FundsError::ConfigError("Could not find home directory".to_string()))?;
    Ok(home_dir.join(CONFIG_FILE))
}

pub fn load_config_from(path: &Path) -> FundsResult<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let config_str = fs::read_to_string(path)?;
    serde_json::from_str(&config_str)
        .map_err(|e| FundsError::ConfigError(format!("{}: {}", path.display(), e)))
}

pub fn save_config_to(path: &Path, config: &Config) -> FundsResult<()> {
    let config_str = serde_json::to_string_pretty(config)?;
    fs::write(path, config_str).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Load the config file from the home directory.
pub fn load_config() -> FundsResult<Config> {
    load_config_from(&config_path()?)
}

pub fn save_config(config: &Config) -> FundsResult<()> {
    save_config_to(&config_path()?, config)
}

/// Config file values with environment overrides applied.
pub fn load_effective_config() -> FundsResult<Config> {
    load_config()?.apply_env()
}
