//! Context-aware error suggestions.
//!
//! Complements the static suggestions in the `codes` module with hints that
//! name the offending field, query or path.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
///
/// Falls back to [`ErrorCode::suggestion`] when the context carries nothing
/// more specific.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::InvalidSpecification => suggest_invalid_specification(context),
        ErrorCode::TranslationFailed => suggest_translation_failed(context),
        ErrorCode::SourceUnavailable => suggest_source_unavailable(context),
        ErrorCode::ConfigMissingRequired => suggest_config_missing_required(context),
        ErrorCode::DuplicateCompanyId => suggest_duplicate_id(context),
        _ => code.suggestion().to_string(),
    }
}

fn context_str<'a>(context: Option<&'a Value>, key: &str) -> Option<&'a str> {
    context.and_then(|c| c.get(key)).and_then(Value::as_str)
}

fn suggest_invalid_specification(context: Option<&Value>) -> String {
    match context_str(context, "reason") {
        Some(reason) if reason.contains("unknown field") => format!(
            "{reason}\nRecognized keys: search, industries, categories, countries, officeLocations, \
             technologiesAnd, technologiesOr, technologiesNot, techCount, officeLocationCount, \
             employeeCount, minRevenue, maxRevenue, foundedYear"
        ),
        Some(reason) => format!(
            "Filter rejected: {reason}\n{}",
            ErrorCode::InvalidSpecification.suggestion()
        ),
        None => ErrorCode::InvalidSpecification.suggestion().to_string(),
    }
}

fn suggest_translation_failed(context: Option<&Value>) -> String {
    match context_str(context, "query") {
        Some(query) => format!(
            "Could not turn \"{query}\" into filters. Previous filters were kept.\n\
             Try naming technologies or countries explicitly, or use `tse search` flags"
        ),
        None => ErrorCode::TranslationFailed.suggestion().to_string(),
    }
}

fn suggest_source_unavailable(context: Option<&Value>) -> String {
    match (context_str(context, "backend"), context_str(context, "path")) {
        (Some("sqlite"), Some(path)) => format!(
            "Database at {path} could not be read. Run `tse seed` to create it"
        ),
        (Some("json"), Some(path)) => format!(
            "Could not read {path}. It must hold a JSON array of companies"
        ),
        _ => ErrorCode::SourceUnavailable.suggestion().to_string(),
    }
}

fn suggest_config_missing_required(context: Option<&Value>) -> String {
    match context_str(context, "config_key") {
        Some(key) => format!(
            "Set `{key}` in config.toml, or export TSE_{}",
            key.replace('.', "_").to_uppercase()
        ),
        None => ErrorCode::ConfigMissingRequired.suggestion().to_string(),
    }
}

fn suggest_duplicate_id(context: Option<&Value>) -> String {
    match context.and_then(|c| c.get("id")).and_then(Value::as_u64) {
        Some(id) => format!(
            "Company id {id} appears more than once. Only the first record is kept; fix the source and re-seed"
        ),
        None => ErrorCode::DuplicateCompanyId.suggestion().to_string(),
    }
}
