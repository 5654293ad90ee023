use super::{PromptzItem, PromptzItemType};
use crate::config::PromptzConfig;
use crate::error::{QcliAgentsError, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const SEARCH_PROMPTS: &str = "query { searchPrompts { results { id name description slug } } }";
const SEARCH_RULES: &str = "query { searchProjectRules { results { id name description slug } } }";
const SEARCH_AGENTS: &str = "query { searchAgents { results { id name description slug } } }";

const PROMPT_BY_SLUG: &str = "query ListPromptBySlug($slug: String!) { listPromptBySlug(slug: $slug) { items { content } } }";
const RULE_BY_SLUG: &str = "query ListProjectRuleBySlug($slug: String!) { listProjectRuleBySlug(slug: $slug) { items { content } } }";
const AGENT_BY_SLUG: &str = "query ListAgentBySlug($slug: String!) { listAgentBySlug(slug: $slug) { items { id name description prompt tools resources allowedTools mcpServers hooks toolsSettings toolAliases useLegacyMcpJson scope owner createdAt updatedAt } } }";

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    slug: Option<String>,
}

pub struct PromptzClient {
    http: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
}

impl PromptzClient {
    pub fn from_config(config: &PromptzConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(QcliAgentsError::PromptzNotConfigured);
        }
        if !(config.api_url.starts_with("https://") || config.api_url.starts_with("http://")) {
            return Err(QcliAgentsError::InvalidConfig(format!(
                "Invalid PromptZ API URL format: {}",
                config.api_url
            )));
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Prompts, then rules, then agents.
    pub fn list_items(&self) -> Result<Vec<PromptzItem>> {
        let mut items = Vec::new();
        for (query, field, kind) in [
            (SEARCH_PROMPTS, "searchPrompts", PromptzItemType::Prompt),
            (SEARCH_RULES, "searchProjectRules", PromptzItemType::Rule),
            (SEARCH_AGENTS, "searchAgents", PromptzItemType::Agent),
        ] {
            let data = self.request(query, None)?;
            items.extend(parse_search_results(&data, field, kind)?);
        }
        Ok(items)
    }

    /// Body of one item. Agents come back as the pretty-printed JSON record.
    pub fn full_content(&self, slug: &str, kind: PromptzItemType) -> Result<String> {
        let (query, field) = match kind {
            PromptzItemType::Prompt => (PROMPT_BY_SLUG, "listPromptBySlug"),
            PromptzItemType::Rule => (RULE_BY_SLUG, "listProjectRuleBySlug"),
            PromptzItemType::Agent => (AGENT_BY_SLUG, "listAgentBySlug"),
        };
        let data = self.request(query, Some(json!({ "slug": slug })))?;
        parse_full_content(&data, field, kind)
    }

    fn request(&self, query: &str, variables: Option<Value>) -> Result<Value> {
        let mut body = json!({ "query": query });
        if let Some(variables) = variables {
            body["variables"] = variables;
        }
        debug!(url = %self.api_url, "PromptZ request");

        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    QcliAgentsError::Promptz("Request timeout".to_string())
                } else if e.is_connect() {
                    QcliAgentsError::Promptz(format!("Cannot connect to PromptZ API: {}", e))
                } else {
                    QcliAgentsError::Promptz(format!("Network error: {}", e))
                }
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(QcliAgentsError::Promptz(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Request failed")
            )));
        }

        let text = response.text()?;
        parse_response(&text)
    }
}

/// `data` of a GraphQL response, or the first reported error.
pub fn parse_response(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text).map_err(|_| {
        let preview: String = text.chars().take(200).collect();
        QcliAgentsError::Promptz(format!("Invalid JSON response: {}...", preview))
    })?;

    if let Some(errors) = value.get("errors").and_then(Value::as_array) {
        let message = errors
            .first()
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(QcliAgentsError::Promptz(format!("GraphQL error: {}", message)));
    }

    Ok(value.get("data").cloned().unwrap_or(Value::Null))
}

pub fn parse_search_results(
    data: &Value,
    field: &str,
    kind: PromptzItemType,
) -> Result<Vec<PromptzItem>> {
    let Some(results) = data.get(field).and_then(|f| f.get("results")) else {
        return Ok(Vec::new());
    };
    let results: Vec<SearchResult> = serde_json::from_value(results.clone())?;
    Ok(results
        .into_iter()
        .map(|r| PromptzItem {
            id: r.id,
            name: r.name,
            content: r.description.unwrap_or_default(),
            kind,
            slug: r.slug,
        })
        .collect())
}

pub fn parse_full_content(data: &Value, field: &str, kind: PromptzItemType) -> Result<String> {
    let first = data
        .get(field)
        .and_then(|f| f.get("items"))
        .and_then(Value::as_array)
        .and_then(|items| items.first());

    match (kind, first) {
        (_, None) => Ok(String::new()),
        (PromptzItemType::Agent, Some(agent)) => Ok(serde_json::to_string_pretty(agent)?),
        (_, Some(item)) => Ok(item
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured() {
        let err = PromptzClient::from_config(&PromptzConfig::default()).err().unwrap();
        assert!(matches!(err, QcliAgentsError::PromptzNotConfigured));

        let config = PromptzConfig {
            api_url: "not a url".into(),
            api_key: "k".into(),
            ..Default::default()
        };
        assert!(matches!(
            PromptzClient::from_config(&config),
            Err(QcliAgentsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_parse_response_errors() {
        let err = parse_response(r#"{"errors":[{"message":"Unauthorized"}]}"#).unwrap_err();
        assert_eq!(err.to_string(), "PromptZ error: GraphQL error: Unauthorized");

        let err = parse_response("<html>").unwrap_err();
        assert!(err.to_string().contains("Invalid JSON response: <html>"));
    }

    #[test]
    fn test_parse_search_results() {
        let data = parse_response(
            r#"{"data":{"searchAgents":{"results":[
                {"id":"1","name":"Reviewer","description":"Reviews code","slug":"reviewer"},
                {"id":"2","name":"Bare","description":null,"slug":null}
            ]}}}"#,
        )
        .unwrap();

        let items = parse_search_results(&data, "searchAgents", PromptzItemType::Agent).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].content, "Reviews code");
        assert_eq!(items[0].lookup_key(), "reviewer");
        assert_eq!(items[1].lookup_key(), "2");
        assert!(parse_search_results(&data, "searchPrompts", PromptzItemType::Prompt)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_full_content() {
        let data = parse_response(
            r#"{"data":{"listPromptBySlug":{"items":[{"content":"Be concise."}]}}}"#,
        )
        .unwrap();
        assert_eq!(
            parse_full_content(&data, "listPromptBySlug", PromptzItemType::Prompt).unwrap(),
            "Be concise."
        );

        let data = parse_response(
            r#"{"data":{"listAgentBySlug":{"items":[{"name":"x","tools":["fs_read"]}]}}}"#,
        )
        .unwrap();
        let content = parse_full_content(&data, "listAgentBySlug", PromptzItemType::Agent).unwrap();
        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["tools"][0], "fs_read");

        let empty = parse_response(r#"{"data":{"listAgentBySlug":{"items":[]}}}"#).unwrap();
        assert_eq!(
            parse_full_content(&empty, "listAgentBySlug", PromptzItemType::Agent).unwrap(),
            ""
        );
    }
}
