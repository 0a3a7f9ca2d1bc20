use std::sync::Arc;

use clap::ArgMatches;

use crate::config::{load_effective_config, Config};
use crate::error::FundsResult;
use crate::ledger::{EvmLedger, FundsLedger, MemoryLedger};
use crate::logging::{log_info, log_warn};
use crate::mirror::{AppwriteMirror, DocumentMirror};
use crate::service::FundsService;

/// Central context for CLI operations, holding the effective configuration
/// and the service built from it
pub struct CliContext {
    config: Config,
    simulate: bool,
    service: Option<Arc<FundsService>>,
}

impl CliContext {
    /// Create an empty context that talks to the in-memory ledger
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            simulate: true,
            service: None,
        }
    }

    /// Load context from the config file and `FUNDS_*` environment
    pub fn load(simulate: bool) -> FundsResult<Self> {
        let config = load_effective_config()?;
        Ok(Self {
            config,
            simulate,
            service: None,
        })
    }

    /// Load context honouring the global `--simulate` flag of the matched command
    pub fn from_matches(matches: &ArgMatches) -> FundsResult<Self> {
        let simulate = matches.try_get_one::<bool>("simulate").ok().flatten().copied().unwrap_or(false);
        Self::load(simulate)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_simulated(&self) -> bool {
        self.simulate
    }

    /// Get or build the service.
    ///
    /// Without `--simulate` this needs the RPC endpoint, contract address and
    /// signer key; the document mirror is attached when its ids are configured.
    pub fn service(&mut self) -> FundsResult<Arc<FundsService>> {
        if let Some(service) = &self.service {
            return Ok(service.clone());
        }

        let ledger: Arc<dyn FundsLedger> = if self.simulate {
            log_info("Using the in-memory ledger");
            Arc::new(MemoryLedger::new())
        } else {
            Arc::new(EvmLedger::from_config(&self.config)?)
        };

        let service = Arc::new(self.assemble(ledger)?);
        self.service = Some(service.clone());
        Ok(service)
    }

    fn assemble(&self, ledger: Arc<dyn FundsLedger>) -> FundsResult<FundsService> {
        let mut service = FundsService::new(ledger);

        if let Some(government) = self.config.government_address()? {
            service = service.with_government(government);
        }

        if self.simulate {
            return Ok(service);
        }

        match self.config.mirror_settings() {
            Some(settings) => {
                let mirror: Arc<dyn DocumentMirror> = Arc::new(AppwriteMirror::new(&settings)?);
                service = service.with_mirror(mirror);
            }
            None => log_warn("Document store not configured; projects will not be mirrored"),
        }
        Ok(service)
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder pattern for creating CLI contexts with specific configurations
pub struct CliContextBuilder {
    config: Option<Config>,
    simulate: bool,
    ledger: Option<Arc<dyn FundsLedger>>,
}

impl CliContextBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            simulate: false,
            ledger: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Use a ready-made ledger instead of connecting from config.
    pub fn with_ledger(mut self, ledger: Arc<dyn FundsLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn build(self) -> FundsResult<CliContext> {
        let mut context = match self.config {
            Some(config) => CliContext {
                config,
                simulate: self.simulate,
                service: None,
            },
            None => CliContext::load(self.simulate)?,
        };

        if let Some(ledger) = self.ledger {
            context.service = Some(Arc::new(context.assemble(ledger)?));
        }

        Ok(context)
    }
}

impl Default for CliContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
