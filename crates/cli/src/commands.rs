//! Subcommand implementations.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, bail};
use serde_json::{Value, json};
use tracing::info;

use civica_search::backends::sqlite::SqliteRepository;
use civica_search::error::{InputError, SearchError};
use civica_search::{Audience, Module, ScopeId, SearchEngine, SearchRequest};

use crate::config::{CliConfig, ImportArgs, SearchArgs};

/// Opens the configured database and makes sure the schema exists.
pub fn open_repository(config: &CliConfig) -> anyhow::Result<SqliteRepository> {
    info!(database = %config.database, "Opening SQLite database");
    let repo = SqliteRepository::open(&config.database)
        .with_context(|| format!("Failed to open database {}", config.database))?;
    repo.init_schema()?;
    Ok(repo)
}

/// Runs one search and returns the envelope as JSON.
pub async fn search(
    engine: &SearchEngine<SqliteRepository>,
    args: &SearchArgs,
) -> Result<Value, SearchError> {
    let audience = match &args.church {
        Some(church) => Audience::scoped(ScopeId::new(church.as_str())),
        None => Audience::unscoped(),
    };

    let mut request = SearchRequest::new(&args.search_type, &args.term).with_order(args.order);
    request.limit = args.limit;
    request.offset = args.offset;
    request.scope_id = args.scope.as_deref().map(ScopeId::new);

    let envelope = engine.search_key(&args.module, &audience, &request).await?;
    Ok(envelope.to_json())
}

/// Renders a search failure for stderr.
pub fn error_body(err: &SearchError) -> Value {
    json!({
        "status": err.status_code(),
        "category": err.category().to_string(),
        "message": err.to_string(),
    })
}

/// Process exit code for a search failure.
pub fn exit_code(err: &SearchError) -> i32 {
    match err {
        SearchError::Rejected(_) => 2,
        SearchError::NotFound { .. } => 3,
        SearchError::Storage(_) => 1,
    }
}

/// Loads records from a JSON file. Returns the count written per collection.
pub fn import(repo: &SqliteRepository, args: &ImportArgs) -> anyhow::Result<BTreeMap<String, usize>> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let batches = match (document, &args.collection) {
        (Value::Array(records), Some(collection)) => vec![(collection.clone(), records)],
        (Value::Array(_), None) => bail!("A top-level array needs --collection"),
        (Value::Object(map), _) => map
            .into_iter()
            .map(|(collection, records)| match records {
                Value::Array(records) => Ok((collection, records)),
                _ => bail!("Collection {} must be an array of records", collection),
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
        _ => bail!("Expected a JSON object or array"),
    };

    let mut counts = BTreeMap::new();
    for (collection, records) in batches {
        let written = repo.insert_many(&collection, records)?;
        info!(collection = %collection, count = written, "Imported records");
        counts.insert(collection, written);
    }
    Ok(counts)
}

/// Lists search type tokens, for one module or all of them.
pub fn list_types(module: Option<&str>) -> Result<Value, InputError> {
    let modules = match module {
        Some(key) => vec![Module::from_key(key)?],
        None => Module::ALL.to_vec(),
    };

    Ok(Value::Object(
        modules
            .into_iter()
            .map(|module| (module.key().to_string(), json!(module.tokens())))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use civica_search::SortDirection;

    use crate::config::{Command, TypesArgs};

    fn repository() -> SqliteRepository {
        let config = CliConfig::for_testing(Command::Types(TypesArgs { module: None }));
        open_repository(&config).unwrap()
    }

    fn search_args(module: &str, search_type: &str, term: &str) -> SearchArgs {
        SearchArgs {
            module: module.to_string(),
            search_type: search_type.to_string(),
            term: term.to_string(),
            church: Some("c1".to_string()),
            scope: None,
            limit: None,
            offset: None,
            order: SortDirection::Ascending,
        }
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, value: Value) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_import_then_search() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(
            &dir,
            "seed.json",
            json!({
                "churches": [{"id": "c1", "name": "Iglesia Central", "isActive": true, "isAnchor": true}],
                "people": [{"id": "p1", "firstNames": "José", "gender": "M"}],
                "members": [{"id": "m1", "personId": "p1", "churchId": "c1", "isActive": true, "createdAt": 1}]
            }),
        );

        let repo = repository();
        let counts = import(&repo, &ImportArgs { file, collection: None }).unwrap();
        assert_eq!(counts.get("members"), Some(&1));
        assert_eq!(counts.len(), 3);

        let engine = SearchEngine::new(Arc::new(repo), Default::default());
        let body = search(&engine, &search_args("members", "Gender", "male"))
            .await
            .unwrap();
        assert_eq!(body["members"][0]["id"], "m1");

        let err = search(&engine, &search_args("members", "Gender", "female"))
            .await
            .unwrap_err();
        assert_eq!(exit_code(&err), 3);
        assert_eq!(error_body(&err)["status"], 404);
        assert!(
            error_body(&err)["message"]
                .as_str()
                .unwrap()
                .contains("Iglesia Central")
        );
    }

    #[tokio::test]
    async fn test_rejected_search() {
        let engine = SearchEngine::new(Arc::new(repository()), Default::default());
        let err = search(&engine, &search_args("members", "Gender", "purple"))
            .await
            .unwrap_err();
        assert_eq!(exit_code(&err), 2);
        assert_eq!(error_body(&err)["category"], "client-error");
    }

    #[test]
    fn test_import_array_needs_collection() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(&dir, "people.json", json!([{"id": "p1"}]));
        let repo = repository();

        assert!(
            import(&repo, &ImportArgs { file: file.clone(), collection: None }).is_err()
        );
        let counts = import(
            &repo,
            &ImportArgs {
                file,
                collection: Some("people".to_string()),
            },
        )
        .unwrap();
        assert_eq!(counts.get("people"), Some(&1));
    }

    #[test]
    fn test_list_types() {
        let all = list_types(None).unwrap();
        assert_eq!(all.as_object().unwrap().len(), 6);
        assert_eq!(all["members"][0], "FirstNames");

        let tithes = list_types(Some("tithes")).unwrap();
        assert!(tithes["tithes"].as_array().unwrap().contains(&json!("MemberFullNames")));

        assert!(list_types(Some("sermons")).is_err());
    }
}
