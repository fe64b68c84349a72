//! The search engine.
//!
//! One call to [`SearchEngine::search`] walks the states
//! `Parsing -> (ResolvingJoin) -> Querying -> Formatting` and ends in
//! exactly one of `Succeeded`, `NotFound` or `Rejected`. Nothing is
//! retried. The engine holds no per-call state, so one instance can serve
//! concurrent searches.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::audience::{Audience, ScopeId};
use crate::config::EngineConfig;
use crate::core::Repository;
use crate::error::{InputError, SearchError, SearchResult, StorageResult};
use crate::types::{FilterPredicate, FindQuery, OrderBy, ResultEnvelope, SearchRequest};

use super::format::{format_envelope, not_found_message};
use super::join::JoinResolver;
use super::modules::Module;
use super::predicate::{PredicateBuilder, term_predicate};
use super::registry::Target;

/// Dispatches search requests to module strategies.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use civica_search::audience::Audience;
/// use civica_search::backends::memory::MemoryRepository;
/// use civica_search::search::{Module, SearchEngine};
/// use civica_search::types::SearchRequest;
/// use civica_search::EngineConfig;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = MemoryRepository::new();
/// repo.insert("people", json!({"id": "p1", "firstNames": "María José", "lastNames": "López"})).unwrap();
/// repo.insert("members", json!({
///     "id": "m1", "personId": "p1", "churchId": "c1", "isActive": true, "createdAt": 1
/// })).unwrap();
///
/// let engine = SearchEngine::new(Arc::new(repo), EngineConfig::default());
/// let audience = Audience::unscoped();
///
/// let envelope = engine
///     .search(Module::Members, &audience, &SearchRequest::new("FirstNames", "maria+jose"))
///     .await
///     .unwrap();
/// assert_eq!(envelope.ids(), vec!["m1"]);
/// # }
/// ```
pub struct SearchEngine<R: Repository + ?Sized> {
    repository: Arc<R>,
    config: EngineConfig,
}

impl<R: Repository + ?Sized> Clone for SearchEngine<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
        }
    }
}

impl<R: Repository + ?Sized> std::fmt::Debug for SearchEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("backend", &self.repository.backend_name())
            .field("config", &self.config)
            .finish()
    }
}

impl<R: Repository + ?Sized> SearchEngine<R> {
    /// Creates an engine over `repository`.
    pub fn new(repository: Arc<R>, config: EngineConfig) -> Self {
        Self { repository, config }
    }

    /// Returns the repository.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs a search against a module given by key (e.g. `"members"`).
    pub async fn search_key(
        &self,
        module: &str,
        audience: &Audience,
        request: &SearchRequest,
    ) -> SearchResult<ResultEnvelope> {
        let module = Module::from_key(module)?;
        self.search(module, audience, request).await
    }

    /// Runs one search.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Rejected`] when the term is empty, the search type is
    ///   unknown to the module, or the term fails its grammar.
    /// - [`SearchError::NotFound`] when the query matched nothing.
    /// - [`SearchError::Storage`] when the repository fails.
    pub async fn search(
        &self,
        module: Module,
        audience: &Audience,
        request: &SearchRequest,
    ) -> SearchResult<ResultEnvelope> {
        let def = module.def();
        let term = request.trimmed_term();
        if term.is_empty() {
            return Err(InputError::EmptyTerm.into());
        }

        let strategy = module.resolve(&request.search_type)?;
        debug!(
            module = def.key,
            search_type = strategy.token,
            "resolved search strategy"
        );

        let parsed = strategy.grammar.parse(strategy.token, term)?;
        debug!(module = def.key, search_type = strategy.token, parsed = ?parsed, "parsed term");

        let scope = audience.effective_scope(request.scope_id.as_ref());
        let builder = PredicateBuilder::new(def, scope);
        let criterion = term_predicate(&strategy, &parsed);

        let predicate = match strategy.target {
            Target::Field(_) => builder.build(criterion, strategy.overrides_status()),
            Target::Joined(join) => {
                let ids = JoinResolver::new(self.repository.as_ref())
                    .related_ids(&join, scope, criterion)
                    .await?;
                builder.build(join.membership(ids), false)
            }
        };

        let (limit, clamped) = self.config.effective_limit(request.limit);
        if clamped {
            warn!(
                requested = ?request.limit,
                max_limit = self.config.max_limit,
                "limit clamped"
            );
        }

        let query = FindQuery::new(def.collection, predicate)
            .with_relations(def.relations)
            .with_page(limit, request.offset_or_default())
            .with_order(
                OrderBy::new(def.order_field, request.order)
                    .with_tie_break(self.config.tie_break_on_id),
            );

        debug!(
            module = def.key,
            collection = def.collection,
            limit,
            offset = query.offset,
            "querying primary collection"
        );
        let records = self.repository.find_many(&query).await?;

        if records.is_empty() {
            let scope_name = self.scope_name(def.scope_field.and(scope)).await?;
            let message = not_found_message(def, &strategy, &parsed, term, &scope_name);
            debug!(module = def.key, search_type = strategy.token, "no matching records");
            return Err(SearchError::NotFound {
                module: def.key.to_string(),
                term: term.to_string(),
                message,
            });
        }

        debug!(module = def.key, count = records.len(), "search succeeded");
        Ok(format_envelope(self.repository.as_ref(), def, records).await?)
    }

    /// Resolves the display name of a scope, falling back to its id.
    async fn scope_name(&self, scope: Option<&ScopeId>) -> StorageResult<String> {
        let Some(scope) = scope else {
            return Ok(self.config.unscoped_label.clone());
        };

        let predicate = FilterPredicate::equals("id", serde_json::json!(scope.as_str()));
        let record = self
            .repository
            .find_one(&self.config.scope_collection, &predicate, &[])
            .await?;

        Ok(record
            .as_ref()
            .and_then(|record| record.get(&self.config.scope_name_field))
            .and_then(|name| name.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| scope.to_string()))
    }
}
