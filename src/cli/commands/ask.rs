//! tse ask - Describe the companies you want in plain language
//!
//! The request goes to the configured model; whatever filters it returns
//! replace the ones given as flags. If translation fails the flag filters
//! stay in effect and the results are shown with a warning.

use clap::Args;

use super::search::{FilterArgs, SortArgs};
use crate::app::AppContext;
use crate::cli::formatters::CompanyResults;
use crate::cli::output;
use crate::error::Result;
use crate::translate::{TranslationOutcome, Translator, translate_or_keep};

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The request, e.g. "fintech in the UK using Azure but not Java"
    #[arg(required = true, num_args = 1..)]
    pub request: Vec<String>,

    /// Filters kept when the request cannot be translated
    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub sort: SortArgs,
}

pub fn run(ctx: &AppContext, args: &AskArgs) -> Result<()> {
    let request = args.request.join(" ");
    let prior = args.filters.to_spec(None)?;
    let catalog = ctx.load_catalog()?;
    let options = catalog.options();

    let outcome = match ctx.translator() {
        Ok(translator) => {
            let translator: &dyn Translator = &translator;
            translate_or_keep(translator, &request, &options, &prior)
        }
        Err(err) => TranslationOutcome {
            spec: prior,
            error: Some(err),
        },
    };

    let results = catalog.search(&outcome.spec)?;
    let page = args.sort.apply(results, ctx.config.search.default_limit);
    let mut view = CompanyResults::new(outcome.spec.text_query().map(str::to_string), page)
        .with_filters(outcome.spec.clone());
    if let Some(err) = &outcome.error {
        view = view.with_warning(format!("{err}; showing results for the previous filters"));
    }

    output::emit(&view, ctx.output_format);
    Ok(())
}
