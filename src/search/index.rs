//! Prefix and fuzzy text index over company fields
//!
//! Every build creates a fresh in-RAM tantivy index, so rebuilding from the
//! same companies always yields the same index. A query token matches an
//! indexed token exactly, as a prefix, or within an edit distance scaled to
//! the token length. Tokens are OR-combined across all indexed fields.

use std::cmp::Ordering;

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, FAST, INDEXED,
    STORED,
};
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::core::Company;
use crate::error::{MsError, Result};

/// Writer heap for a single indexing thread (tantivy's per-thread minimum).
const WRITER_HEAP_BYTES: usize = 15_000_000;

/// Largest edit distance tantivy's Levenshtein automata support.
pub const MAX_EDIT_DISTANCE: u8 = 2;

/// Names of the indexed text fields, in schema order.
pub const INDEXED_FIELDS: [&str; 7] = [
    "name",
    "domain",
    "industry",
    "technologies",
    "hq_country",
    "office_locations",
    "category",
];

/// Matching knobs for [`TextIndex::query`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexOptions {
    /// Edit-distance tolerance as a fraction of token length
    pub fuzzy: f32,
    /// Whether a query token may match as a prefix of an indexed token
    pub prefix: bool,
    /// Upper bound on the fuzzy edit distance (at most [`MAX_EDIT_DISTANCE`])
    pub max_edit_distance: u8,
    pub prefix_boost: f32,
    pub fuzzy_boost: f32,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            fuzzy: 0.2,
            prefix: true,
            max_edit_distance: MAX_EDIT_DISTANCE,
            prefix_boost: 0.375,
            fuzzy_boost: 0.45,
        }
    }
}

impl From<&SearchConfig> for IndexOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            fuzzy: config.fuzzy,
            prefix: config.prefix,
            max_edit_distance: config.max_edit_distance.min(MAX_EDIT_DISTANCE),
            prefix_boost: config.prefix_boost,
            fuzzy_boost: config.fuzzy_boost,
        }
    }
}

impl IndexOptions {
    /// Edit distance allowed for a token: `round(chars * fuzzy)`, capped.
    #[must_use]
    pub fn edit_distance(&self, token: &str) -> u8 {
        let scaled = (token.chars().count() as f32 * self.fuzzy).round();
        if scaled <= 0.0 {
            return 0;
        }
        let cap = self.max_edit_distance.min(MAX_EDIT_DISTANCE);
        if scaled >= f32::from(cap) {
            cap
        } else {
            scaled as u8
        }
    }
}

/// One ranked match.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub id: u64,
    pub score: f32,
}

#[derive(Clone)]
struct IndexFields {
    id: Field,
    text: Vec<Field>,
}

/// Read-only text index over one company collection.
pub struct TextIndex {
    index: Index,
    reader: IndexReader,
    fields: IndexFields,
    options: IndexOptions,
}

impl std::fmt::Debug for TextIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextIndex")
            .field("num_docs", &self.num_docs())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl TextIndex {
    /// Index `name, domain, industry, technologies, hq_country,
    /// office_locations, category` for every company.
    pub fn build(companies: &[Company], options: IndexOptions) -> Result<Self> {
        let schema = build_schema();
        let fields = extract_fields(&schema)?;
        let index = Index::create_in_ram(schema);

        // One thread keeps document order equal to input order.
        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;
        for company in companies {
            writer.add_document(company_document(&fields, company))?;
        }
        writer.commit()?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        debug!(documents = companies.len(), "built text index");

        Ok(Self {
            index,
            reader,
            fields,
            options,
        })
    }

    /// Ids of matching companies, best match first, ties by id ascending.
    ///
    /// Empty or whitespace-only text and an empty index both yield no ids.
    /// Internal query failures are logged and also yield no ids.
    pub fn query(&self, text: &str) -> Vec<u64> {
        match self.ranked(text) {
            Ok(hits) => hits.into_iter().map(|hit| hit.id).collect(),
            Err(err) => {
                warn!(error = %err, query = text, "text index query failed");
                Vec::new()
            }
        }
    }

    /// Scored matches in rank order.
    pub fn ranked(&self, text: &str) -> Result<Vec<IndexHit>> {
        let num_docs = self.num_docs();
        if num_docs == 0 {
            return Ok(Vec::new());
        }

        let tokens = self.tokenize(text)?;
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.build_query(&tokens);
        let searcher = self.reader.searcher();
        let limit = usize::try_from(num_docs).unwrap_or(usize::MAX).max(1);
        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            if let Some(id) = doc.get_first(self.fields.id).and_then(|v| v.as_u64()) {
                hits.push(IndexHit { id, score });
            }
        }

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        debug!(query = text, tokens = tokens.len(), hits = hits.len(), "text query");
        Ok(hits)
    }

    /// Number of indexed companies.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    pub fn is_empty(&self) -> bool {
        self.num_docs() == 0
    }

    #[must_use]
    pub const fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Split query text with the same analyzer used at index time.
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut analyzer = self.index.tokenizer_for_field(self.fields.text[0])?;
        let mut stream = analyzer.token_stream(text);
        let mut tokens: Vec<String> = Vec::new();
        while stream.advance() {
            let token = &stream.token().text;
            if !token.is_empty() && !tokens.contains(token) {
                tokens.push(token.clone());
            }
        }
        Ok(tokens)
    }

    fn build_query(&self, tokens: &[String]) -> BooleanQuery {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for token in tokens {
            let distance = self.options.edit_distance(token);
            for &field in &self.fields.text {
                let term = Term::from_field_text(field, token);
                clauses.push((
                    Occur::Should,
                    Box::new(TermQuery::new(term.clone(), IndexRecordOption::WithFreqs)),
                ));
                if self.options.prefix {
                    clauses.push((
                        Occur::Should,
                        Box::new(BoostQuery::new(
                            Box::new(FuzzyTermQuery::new_prefix(term.clone(), 0, true)),
                            self.options.prefix_boost,
                        )),
                    ));
                }
                if distance > 0 {
                    clauses.push((
                        Occur::Should,
                        Box::new(BoostQuery::new(
                            Box::new(FuzzyTermQuery::new(term, distance, true)),
                            self.options.fuzzy_boost,
                        )),
                    ));
                }
            }
        }
        BooleanQuery::new(clauses)
    }
}

fn company_document(fields: &IndexFields, company: &Company) -> TantivyDocument {
    let mut doc = TantivyDocument::new();
    doc.add_u64(fields.id, company.id);
    // Same order as INDEXED_FIELDS.
    doc.add_text(fields.text[0], &company.name);
    doc.add_text(fields.text[1], &company.domain);
    doc.add_text(fields.text[2], &company.industry);
    for technology in &company.technologies {
        doc.add_text(fields.text[3], technology);
    }
    doc.add_text(fields.text[4], &company.hq_country);
    for office in &company.office_locations {
        doc.add_text(fields.text[5], office);
    }
    doc.add_text(fields.text[6], &company.category);
    doc
}

fn build_schema() -> Schema {
    let mut builder = Schema::builder();

    let text_options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer("default")
            .set_index_option(IndexRecordOption::WithFreqs),
    );

    builder.add_u64_field("id", INDEXED | STORED | FAST);
    for name in INDEXED_FIELDS {
        builder.add_text_field(name, text_options.clone());
    }

    builder.build()
}

fn extract_fields(schema: &Schema) -> Result<IndexFields> {
    let field = |name: &str| {
        schema.get_field(name).map_err(|_| {
            MsError::SearchIndex(tantivy::TantivyError::SchemaError(format!(
                "missing {name} field"
            )))
        })
    };

    Ok(IndexFields {
        id: field("id")?,
        text: INDEXED_FIELDS
            .iter()
            .map(|name| field(name))
            .collect::<Result<Vec<_>>>()?,
    })
}
