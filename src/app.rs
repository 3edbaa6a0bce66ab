use std::path::PathBuf;

use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::config::{Config, SourceBackend};
use crate::error::Result;
use crate::search::{Catalog, IndexOptions};
use crate::storage::{CompanySource, open_source};
use crate::translate::OllamaTranslator;

pub struct AppContext {
    pub config_path: Option<PathBuf>,
    pub config: Config,
    pub output_format: OutputFormat,
    pub verbosity: u8,
    pub quiet: bool,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        let config_path = cli
            .config
            .clone()
            .or_else(|| std::env::var_os("TSE_CONFIG").map(PathBuf::from))
            .or_else(Config::global_path);

        Ok(Self {
            config_path,
            config,
            output_format: cli.output_format(),
            verbosity: cli.verbose,
            quiet: cli.quiet,
        })
    }

    /// Context over an explicit config, for embedding and tests.
    pub fn with_config(config: Config, output_format: OutputFormat) -> Self {
        Self {
            config_path: None,
            config,
            output_format,
            verbosity: 0,
            quiet: false,
        }
    }

    pub fn index_options(&self) -> IndexOptions {
        IndexOptions::from(&self.config.search)
    }

    pub fn source(&self) -> Result<Box<dyn CompanySource>> {
        open_source(&self.config)
    }

    /// Read the configured source into a searchable catalog.
    pub fn load_catalog(&self) -> Result<Catalog> {
        let source = self.source()?;
        let companies = source.fetch_all()?;
        if companies.is_empty() && self.config.source.backend == SourceBackend::Sqlite {
            warn!(source = %source.describe(), "company directory is empty; run `tse seed`");
        }
        info!(source = %source.describe(), companies = companies.len(), "loaded company directory");
        Ok(Catalog::new(companies, self.index_options()))
    }

    pub fn translator(&self) -> Result<OllamaTranslator> {
        OllamaTranslator::new(&self.config.translator)
    }
}
