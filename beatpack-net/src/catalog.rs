// beatpack-net/src/catalog.rs
use std::time::Duration;

use beatpack_common::config::Config;
use beatpack_common::error::{BeatpackError, Result};
use beatpack_common::model::{ArtifactContainer, ContainerKind};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const CATALOG_TIMEOUT_MS: u64 = 3000;
const USER_AGENT_STRING: &str = "beatpack installer builder (Rust)";

const BRANCHES_DOC: &str = "branches";
const VERSIONS_DOC: &str = "versions";
const BRANCHES_FIELD: &str = "branches";
const VERSIONS_FIELD: &str = "versions";
const ALIASES_FIELD: &str = "aliases";

/// Lists every named container the remote catalog publishes: branches first,
/// then versions, then aliases. Duplicate names across kinds are preserved,
/// the kind keeps them apart.
pub async fn list_named_containers(config: &Config) -> Result<Vec<ArtifactContainer>> {
    let client = build_catalog_client()?;

    let branches_doc = get_json(&client, &config.catalog_base_url, BRANCHES_DOC).await?;
    let mut containers = parse_branches(&branches_doc);

    let versions_doc = get_json(&client, &config.catalog_base_url, VERSIONS_DOC).await?;
    containers.extend(parse_versions_and_aliases(&versions_doc));

    debug!("Catalog listed {} named containers", containers.len());
    Ok(containers)
}

pub fn parse_branches(doc: &Value) -> Vec<ArtifactContainer> {
    collect_names(doc, BRANCHES_FIELD, ContainerKind::Branch)
}

pub fn parse_versions_and_aliases(doc: &Value) -> Vec<ArtifactContainer> {
    let mut items = collect_names(doc, VERSIONS_FIELD, ContainerKind::Version);
    items.extend(collect_names(doc, ALIASES_FIELD, ContainerKind::Alias));
    items
}

// A missing array field means "nothing published", not a malformed document.
fn collect_names(doc: &Value, field: &str, kind: ContainerKind) -> Vec<ArtifactContainer> {
    doc.get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|name| ArtifactContainer::new(name, kind))
                .collect()
        })
        .unwrap_or_default()
}

fn build_catalog_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(CATALOG_TIMEOUT_MS))
        .user_agent(USER_AGENT_STRING)
        .build()
        .map_err(|e| BeatpackError::Transport(format!("Failed to build HTTP client: {e}")))
}

async fn get_json(client: &Client, base_url: &str, doc: &str) -> Result<Value> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), doc);
    debug!("Fetching catalog document: {}", url);

    let response = client.get(&url).send().await.map_err(|e| {
        if e.is_timeout() {
            BeatpackError::Transport(format!(
                "Catalog request timed out after {CATALOG_TIMEOUT_MS} ms: {url}"
            ))
        } else {
            BeatpackError::Transport(format!("Catalog request failed for {url}: {e}"))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(BeatpackError::Transport(format!(
            "Catalog endpoint returned HTTP {status} for {url}"
        )));
    }

    Ok(response.json::<Value>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_arrays_parse_to_empty_lists() {
        let empty = json!({});
        assert!(parse_branches(&empty).is_empty());
        assert!(parse_versions_and_aliases(&empty).is_empty());

        let unrelated = json!({ "other": ["x"] });
        assert!(parse_branches(&unrelated).is_empty());
        assert!(parse_versions_and_aliases(&unrelated).is_empty());
    }

    #[test]
    fn concatenation_order_is_versions_then_aliases() {
        let doc = json!({
            "aliases": ["8.x-alias"],
            "versions": ["8.0.0", "8.1.0"],
        });
        let items = parse_versions_and_aliases(&doc);
        assert_eq!(
            items,
            vec![
                ArtifactContainer::new("8.0.0", ContainerKind::Version),
                ArtifactContainer::new("8.1.0", ContainerKind::Version),
                ArtifactContainer::new("8.x-alias", ContainerKind::Alias),
            ]
        );
    }

    #[test]
    fn duplicate_names_across_kinds_are_preserved() {
        let doc = json!({ "versions": ["8.x"], "aliases": ["8.x"] });
        let items = parse_versions_and_aliases(&doc);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, ContainerKind::Version);
        assert_eq!(items[1].kind, ContainerKind::Alias);
        assert_eq!(items[0].name, items[1].name);
    }

    #[test]
    fn non_string_entries_are_skipped() {
        let doc = json!({ "branches": ["master", 42, null, "8.x"] });
        let items = parse_branches(&doc);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "master");
        assert_eq!(items[1].name, "8.x");
    }
}
