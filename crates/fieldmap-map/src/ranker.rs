//! Batch ranking collaborator and the chat-completions client.
//!
//! A ranker either returns a ranked match per requested column or a
//! [`Degraded`] reason; the engine treats every `Degraded` the same way and
//! falls back to local similarity.

use std::collections::BTreeMap;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use fieldmap_model::clamp_score;

use crate::config::RankerConfig;

const SYSTEM_PROMPT: &str = "You map source dataset fields to XSD target element paths.\n\
Return STRICT JSON: an array of {source:string, target:string, score:number, rationale:string}.\n\
Score 0..1 float; prefer exact semantic matches; if unsure choose closest but lower score.";

const TEMPERATURE: f64 = 0.1;

/// One batched ranking request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankRequest {
    #[serde(rename = "sourceColumns")]
    pub columns: Vec<String>,
    #[serde(rename = "targetPaths")]
    pub targets: Vec<String>,
    #[serde(rename = "sourceSamples")]
    pub samples: BTreeMap<String, Vec<String>>,
}

/// A ranked candidate for one source column.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch {
    pub source: String,
    /// `None` when the ranker left the column unmapped.
    pub target: Option<String>,
    /// Clamped into `[0, 1]`.
    pub score: f64,
    pub rationale: String,
}

/// Why a ranking attempt produced no usable result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Degraded {
    #[error("ranking request timed out")]
    Timeout,
    #[error("ranking request failed: {0}")]
    Transport(String),
    #[error("ranking service answered with status {0}")]
    Status(u16),
    #[error("unreadable ranking payload: {0}")]
    Payload(String),
    #[error("ranking payload contained no matches")]
    Empty,
    #[error("incomplete ranking payload: {0}")]
    Incomplete(String),
}

impl From<reqwest::Error> for Degraded {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Batch ranking of source columns against target paths.
pub trait MatchRanker: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn rank(&self, request: &RankRequest) -> Result<Vec<RankedMatch>, Degraded>;
}

/// Ranker backed by an Azure OpenAI chat-completions deployment.
pub struct AzureChatRanker {
    client: Client,
    config: RankerConfig,
}

impl AzureChatRanker {
    pub fn new(config: RankerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    fn request_body(request: &RankRequest) -> Result<Value, Degraded> {
        let user = serde_json::to_string(request).map_err(|e| Degraded::Payload(e.to_string()))?;
        Ok(json!({
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user },
            ],
            "temperature": TEMPERATURE,
            "response_format": { "type": "json_object" },
        }))
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl MatchRanker for AzureChatRanker {
    fn name(&self) -> &str {
        "azure-openai"
    }

    fn rank(&self, request: &RankRequest) -> Result<Vec<RankedMatch>, Degraded> {
        let body = Self::request_body(request)?;
        debug!(
            deployment = %self.config.deployment,
            columns = request.columns.len(),
            targets = request.targets.len(),
            "requesting ranked matches"
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Degraded::Status(status.as_u16()));
        }

        let chat: ChatResponse = response.json()?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| "{}".to_string());
        parse_rank_payload(&content)
    }
}

/// Parses the model's message content into ranked matches.
///
/// The content is JSON: either an array of `{source, target, score,
/// rationale}` items or an object holding such an array under `mappings` or
/// `data`. Non-numeric scores become 0 and all scores are clamped.
pub fn parse_rank_payload(content: &str) -> Result<Vec<RankedMatch>, Degraded> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| Degraded::Payload(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object
            .remove("mappings")
            .or_else(|| object.remove("data"))
        {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(Degraded::Payload(format!(
                    "expected a list of matches, found {}",
                    json_kind(&other)
                )));
            }
            None => Vec::new(),
        },
        other => {
            return Err(Degraded::Payload(format!(
                "expected a list of matches, found {}",
                json_kind(&other)
            )));
        }
    };
    if items.is_empty() {
        return Err(Degraded::Empty);
    }

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| ranked_match(idx, item))
        .collect()
}

fn ranked_match(idx: usize, item: &Value) -> Result<RankedMatch, Degraded> {
    let source = item
        .get("source")
        .and_then(Value::as_str)
        .ok_or_else(|| Degraded::Payload(format!("match {idx} has no source")))?;
    let target = item
        .get("target")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    let rationale = item
        .get("rationale")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(RankedMatch {
        source: source.to_string(),
        target,
        score: score_value(item.get("score")),
        rationale,
    })
}

fn score_value(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    clamp_score(raw)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let matches = parse_rank_payload(
            r#"[{"source":"amount","target":"invoice/Amount","score":0.92,"rationale":"same meaning"}]"#,
        )
        .expect("payload");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].target.as_deref(), Some("invoice/Amount"));
        assert_eq!(matches[0].score, 0.92);
        assert_eq!(matches[0].rationale, "same meaning");
    }

    #[test]
    fn parses_wrapped_lists() {
        let wrapped = parse_rank_payload(r#"{"mappings":[{"source":"a","target":"x/A","score":1}]}"#)
            .expect("mappings key");
        assert_eq!(wrapped[0].source, "a");
        let data = parse_rank_payload(r#"{"data":[{"source":"b","target":"x/B","score":"0.5"}]}"#)
            .expect("data key");
        assert_eq!(data[0].score, 0.5);
    }

    #[test]
    fn clamps_and_defaults_scores() {
        let matches = parse_rank_payload(
            r#"[{"source":"a","target":"t","score":7},
                {"source":"b","target":"t","score":-1},
                {"source":"c","target":"t","score":"high"},
                {"source":"d","target":""}]"#,
        )
        .expect("payload");
        let scores: Vec<f64> = matches.iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![1.0, 0.0, 0.0, 0.0]);
        assert!(matches[3].target.is_none());
    }

    #[test]
    fn rejects_unusable_payloads() {
        assert!(matches!(parse_rank_payload("not json"), Err(Degraded::Payload(_))));
        assert_eq!(parse_rank_payload("{}"), Err(Degraded::Empty));
        assert_eq!(parse_rank_payload("[]"), Err(Degraded::Empty));
        assert!(matches!(
            parse_rank_payload(r#"{"mappings":"none"}"#),
            Err(Degraded::Payload(_))
        ));
        assert!(matches!(
            parse_rank_payload(r#"[{"target":"x"}]"#),
            Err(Degraded::Payload(_))
        ));
    }

    #[test]
    fn request_serializes_with_collaborator_field_names() {
        let request = RankRequest {
            columns: vec!["amount".to_string()],
            targets: vec!["invoice/Amount".to_string()],
            samples: BTreeMap::from([("amount".to_string(), vec!["12.50".to_string()])]),
        };
        let body = AzureChatRanker::request_body(&request).expect("body");
        assert_eq!(body["temperature"], 0.1);
        assert_eq!(body["response_format"]["type"], "json_object");
        let user = body["messages"][1]["content"].as_str().expect("user content");
        insta::assert_snapshot!(user, @r#"{"sourceColumns":["amount"],"targetPaths":["invoice/Amount"],"sourceSamples":{"amount":["12.50"]}}"#);
    }
}
