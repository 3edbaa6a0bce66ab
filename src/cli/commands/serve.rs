//! tse serve - Run the HTTP query service

use std::sync::Arc;

use clap::Args;
use tracing::{info, warn};

use crate::app::AppContext;
use crate::error::{MsError, Result};
use crate::search::{Catalog, SharedCatalog};
use crate::server::{self, ServerState};
use crate::translate::Translator;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (default from [server] address)
    #[arg(long, value_name = "HOST:PORT")]
    pub address: Option<String>,

    /// Serve without the translate and suggest endpoints
    #[arg(long)]
    pub no_translator: bool,
}

fn build_state(ctx: &AppContext, args: &ServeArgs) -> Result<ServerState> {
    let source: Arc<dyn crate::storage::CompanySource> = Arc::from(ctx.source()?);
    let companies = source.fetch_all()?;
    let catalog = Catalog::with_index(companies, ctx.index_options())?;
    info!(source = %source.describe(), companies = catalog.len(), "catalog ready");

    let translator: Option<Arc<dyn Translator>> = if args.no_translator {
        None
    } else {
        match ctx.translator() {
            Ok(translator) => Some(Arc::new(translator)),
            Err(err) => {
                warn!(error = %err, "translator unavailable; translate and suggest will return 503");
                None
            }
        }
    };

    Ok(ServerState {
        catalog: SharedCatalog::new(catalog),
        source,
        translator,
    })
}

pub fn run(ctx: &AppContext, args: &ServeArgs) -> Result<()> {
    let address = args
        .address
        .clone()
        .unwrap_or_else(|| ctx.config.server.address.clone());
    let state = Arc::new(build_state(ctx, args)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| MsError::Internal(format!("start runtime: {err}")))?;
    runtime.block_on(server::serve(state, &address))
}
