pub const CONFIG_FILE: &str = ".infra-funds-config.json";
pub const APP_DIR: &str = "infra-funds";

pub const DEFAULT_NETWORK: &str = "sepolia";
pub const DEFAULT_APPWRITE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

// Environment overrides, checked after the config file
pub const ENV_NETWORK: &str = "FUNDS_NETWORK";
pub const ENV_RPC_API_KEY: &str = "FUNDS_RPC_API_KEY";
pub const ENV_RPC_URL: &str = "FUNDS_RPC_URL";
pub const ENV_CONTRACT_ADDRESS: &str = "FUNDS_CONTRACT_ADDRESS";
pub const ENV_SIGNER_PRIVATE_KEY: &str = "FUNDS_SIGNER_PRIVATE_KEY";
pub const ENV_GOVERNMENT_ADDRESS: &str = "FUNDS_GOVERNMENT_ADDRESS";
pub const ENV_GAS_LIMIT: &str = "FUNDS_GAS_LIMIT";
pub const ENV_APPWRITE_ENDPOINT: &str = "FUNDS_APPWRITE_ENDPOINT";
pub const ENV_APPWRITE_PROJECT: &str = "FUNDS_APPWRITE_PROJECT";
pub const ENV_APPWRITE_API_KEY: &str = "FUNDS_APPWRITE_API_KEY";
pub const ENV_DATABASE_ID: &str = "FUNDS_DATABASE_ID";
pub const ENV_PROJECTS_COLLECTION_ID: &str = "FUNDS_PROJECTS_COLLECTION_ID";

pub const WEI_PER_ETHER_DECIMALS: usize = 18;

pub const FUNDING_NO: &str = "No";
pub const FUNDING_ACCEPTING: &str = "Accepting Funds";
pub const FUNDING_YES: &str = "Yes";
