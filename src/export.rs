//! CSV and JSON export of result sets

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::Company;
use crate::error::{MsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// One CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ExportField {
    Id,
    Name,
    Domain,
    Industry,
    Category,
    HqCountry,
    Founded,
    RevenueUsd,
    Employees,
    TechCount,
    Technologies,
    OfficeLocations,
}

impl ExportField {
    pub const ALL: [Self; 12] = [
        Self::Id,
        Self::Name,
        Self::Domain,
        Self::Industry,
        Self::Category,
        Self::HqCountry,
        Self::Founded,
        Self::RevenueUsd,
        Self::Employees,
        Self::TechCount,
        Self::Technologies,
        Self::OfficeLocations,
    ];

    pub const fn header(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Domain => "domain",
            Self::Industry => "industry",
            Self::Category => "category",
            Self::HqCountry => "hq_country",
            Self::Founded => "founded",
            Self::RevenueUsd => "revenue_usd",
            Self::Employees => "employees",
            Self::TechCount => "tech_count",
            Self::Technologies => "technologies",
            Self::OfficeLocations => "office_locations",
        }
    }

    fn cell(self, company: &Company) -> String {
        match self {
            Self::Id => company.id.to_string(),
            Self::Name => company.name.clone(),
            Self::Domain => company.domain.clone(),
            Self::Industry => company.industry.clone(),
            Self::Category => company.category.clone(),
            Self::HqCountry => company.hq_country.clone(),
            Self::Founded => company.founded.map(|y| y.to_string()).unwrap_or_default(),
            Self::RevenueUsd => company.revenue.to_string(),
            Self::Employees => company.employees.to_string(),
            Self::TechCount => company.tech_count().to_string(),
            Self::Technologies => company.technologies.join("; "),
            Self::OfficeLocations => company.office_locations.join("; "),
        }
    }
}

/// Render `companies` as CSV with a header row. An empty `fields` slice
/// selects every column. Cells holding a comma, quote or line break are
/// quoted.
pub fn to_csv(companies: &[Company], fields: &[ExportField]) -> Result<String> {
    let fields = if fields.is_empty() {
        &ExportField::ALL[..]
    } else {
        fields
    };

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(fields.iter().map(|field| field.header()))
        .map_err(csv_error)?;
    for company in companies {
        writer
            .write_record(fields.iter().map(|field| field.cell(company)))
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| MsError::Serialization(format!("export csv: {}", err.error())))?;
    String::from_utf8(bytes).map_err(|err| MsError::Serialization(format!("export csv: {err}")))
}

fn csv_error(err: csv::Error) -> MsError {
    MsError::Serialization(format!("export csv: {err}"))
}

pub fn to_json(companies: &[Company]) -> Result<String> {
    serde_json::to_string_pretty(companies)
        .map_err(|err| MsError::Serialization(format!("export json: {err}")))
}

pub fn render(
    companies: &[Company],
    format: ExportFormat,
    fields: &[ExportField],
) -> Result<String> {
    match format {
        ExportFormat::Csv => to_csv(companies, fields),
        ExportFormat::Json => to_json(companies),
    }
}

/// Compact dollar amount: `$1.5B`, `$120.0M`, `$7.5K`, `$900`.
pub fn format_revenue(value: u64) -> String {
    const BILLION: u64 = 1_000_000_000;
    const MILLION: u64 = 1_000_000;
    const THOUSAND: u64 = 1_000;

    #[allow(clippy::cast_precision_loss)]
    let scaled = |unit: u64| value as f64 / unit as f64;
    if value >= BILLION {
        format!("${:.1}B", scaled(BILLION))
    } else if value >= MILLION {
        format!("${:.1}M", scaled(MILLION))
    } else if value >= THOUSAND {
        format!("${:.1}K", scaled(THOUSAND))
    } else {
        format!("${value}")
    }
}
