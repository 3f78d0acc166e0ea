//! Command implementations for the folio CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::cache::MemoryCacheStore;
use crate::catalog::CatalogDocument;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::FolioConfig;
use crate::error::{FolioError, Result};
use crate::query::{MarkerPair, QueryCompiler, SearchRequest, validate_suggest_query};
use crate::service::SearchService;
use crate::store::MemoryIndexStore;

/// Execute a CLI command.
pub async fn execute_command(args: FolioArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    match &args.command {
        Command::Search(search_args) => search_catalog(search_args, &config, &args).await,
        Command::Suggest(suggest_args) => suggest(suggest_args, &config, &args).await,
    }
}

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<FolioConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            FolioConfig::from_file(path)
        }
        None => Ok(FolioConfig::default()),
    }
}

/// Read catalog documents from a JSON array or a JSON lines file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogDocument>> {
    let content = fs::read_to_string(path)?;

    if content.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(&content)?);
    }

    let mut documents = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let document = serde_json::from_str(line).map_err(|e| {
            FolioError::serialization(format!(
                "{}:{}: invalid document: {e}",
                path.display(),
                line_num + 1
            ))
        })?;
        documents.push(document);
    }
    Ok(documents)
}

/// Build a service over an in-memory copy of the catalog.
fn open_service(catalog: &Path, config: &FolioConfig) -> Result<SearchService> {
    let documents = load_catalog(catalog)?;
    info!(path = %catalog.display(), documents = documents.len(), "catalog loaded");

    let index = Arc::new(MemoryIndexStore::with_documents(documents));
    let cache = Arc::new(MemoryCacheStore::new());
    Ok(SearchService::new(index, cache, config.clone()))
}

/// Build the search request described by the arguments.
///
/// Markers are only set when given on the command line; a missing half is
/// taken from the configuration.
fn search_request(args: &SearchArgs, config: &FolioConfig) -> Result<SearchRequest> {
    let mut request = SearchRequest::new(args.query.as_str())
        .page(args.page)
        .limit(args.limit.unwrap_or(config.pagination.default_limit))
        .highlight(args.highlight);

    if args.start_marker.is_some() || args.end_marker.is_some() {
        request = request.markers(MarkerPair::new(
            args.start_marker
                .clone()
                .unwrap_or_else(|| config.highlight.start_marker.clone()),
            args.end_marker
                .clone()
                .unwrap_or_else(|| config.highlight.end_marker.clone()),
        ));
    }

    request.validate(&config.pagination)?;
    Ok(request)
}

/// Search the catalog.
async fn search_catalog(args: &SearchArgs, config: &FolioConfig, cli_args: &FolioArgs) -> Result<()> {
    let request = search_request(args, config)?;
    let mut service = open_service(&args.catalog, config)?;
    if args.exact {
        service = service.with_compiler(QueryCompiler::new().with_prefix_match(false));
    }

    let start_time = Instant::now();
    let query = service.compile(&request);
    let result = service.search(&request).await?;
    let duration = start_time.elapsed();

    output_result(
        &SearchOutput {
            query: request.query.clone(),
            expression: query.compiled.to_expression(),
            page: query.pagination.page,
            limit: query.pagination.limit,
            total: result.total,
            duration_ms: duration.as_millis() as u64,
            documents: result.documents,
        },
        cli_args,
    )
}

/// Autocomplete against the catalog.
async fn suggest(args: &SuggestArgs, config: &FolioConfig, cli_args: &FolioArgs) -> Result<()> {
    validate_suggest_query(&args.query, config.suggestion.min_query_chars)?;
    if let Some(limit) = args.limit
        && (limit < 1 || limit > config.suggestion.max_limit)
    {
        return Err(FolioError::validation(format!(
            "limit must be between 1 and {}",
            config.suggestion.max_limit
        )));
    }

    let service = open_service(&args.catalog, config)?;

    let start_time = Instant::now();
    let suggestions = service.suggest(&args.query, args.limit).await?;
    let duration = start_time.elapsed();

    output_result(
        &SuggestOutput {
            query: args.query.clone(),
            duration_ms: duration.as_millis() as u64,
            suggestions,
        },
        cli_args,
    )
}
