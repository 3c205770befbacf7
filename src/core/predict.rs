use crate::config::Config;
use crate::error::{Error, Result};
use async_openai::{
    self,
    config::OpenAIConfig,
    types::responses::{
        CreateResponseArgs, EasyInputMessageArgs, InputItem, InputParam, OutputItem,
        OutputMessageContent, Response, Role,
    },
};
use derive_more::Display;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are a financial analyst.";

/// Chat-style completion backend: one system message, one user message, one reply.
pub trait Completer {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum PredictionFailure {
    #[display("completion request failed: {_0}")]
    Request(String),
    #[display("could not convert reply to a number: {_0:?}")]
    Unparseable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Price(f64),
    NoTranscripts,
    Failed(PredictionFailure),
}

pub struct PredictionService<C> {
    completer: C,
}

impl<C> PredictionService<C> {
    #[cfg(test)]
    pub fn completer(&self) -> &C {
        &self.completer
    }
}

impl<C: Completer> PredictionService<C> {
    pub fn new(completer: C) -> Self {
        Self { completer }
    }

    pub async fn predict(&self, transcripts: &[String]) -> Prediction {
        let Some(combined) = combine_transcripts(transcripts) else {
            return Prediction::NoTranscripts;
        };
        debug!(chars = combined.len(), "requesting price prediction");

        let reply = match self
            .completer
            .complete(SYSTEM_PROMPT, &user_prompt(&combined))
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "prediction request failed");
                return Prediction::Failed(PredictionFailure::Request(e.to_string()));
            }
        };

        match parse_prediction(&reply) {
            Ok(price) => Prediction::Price(price),
            Err(failure) => {
                warn!(%failure, "prediction reply rejected");
                Prediction::Failed(failure)
            }
        }
    }
}

/// Space-joins the non-empty transcripts; `None` when nothing is left.
pub fn combine_transcripts(transcripts: &[String]) -> Option<String> {
    let combined = transcripts
        .iter()
        .filter(|t| !t.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    (!combined.is_empty()).then_some(combined)
}

fn user_prompt(combined: &str) -> String {
    format!(
        "Based on the following transcripts, predict the stock price in 24 hours:\n{combined}\nProvide only a single numerical value as the prediction."
    )
}

/// The whole trimmed reply must be a float; trailing prose is rejected.
/// `nan` and `inf` spellings are accepted.
pub fn parse_prediction(reply: &str) -> std::result::Result<f64, PredictionFailure> {
    let trimmed = reply.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| PredictionFailure::Unparseable(trimmed.to_string()))
}

/// Text of the first message in a response, mirroring "first choice" semantics.
/// Reasoning and tool items ahead of it are skipped.
fn reply_text(response: Response) -> Result<String> {
    let message = response
        .output
        .into_iter()
        .find_map(|output| match output {
            OutputItem::Message(message) => Some(message),
            _ => None,
        })
        .ok_or_else(|| Error::custom("Completion returned no message"))?;

    let mut content = String::new();
    for c in message.content {
        match c {
            OutputMessageContent::OutputText(text) => content.push_str(&text.text),
            other => debug!(?other, "ignoring non-text completion content"),
        }
    }

    Ok(content)
}

#[derive(Clone)]
pub struct OpenAiCompleter {
    client: async_openai::Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiCompleter {
    pub fn new(config: &Config) -> Self {
        let mut openai = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());
        if let Some(base) = &config.openai_api_base {
            openai = openai.with_api_base(base.clone());
        }

        Self {
            client: async_openai::Client::with_config(openai),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

impl Completer for OpenAiCompleter {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = CreateResponseArgs::default()
            .model(self.model.as_str())
            .temperature(self.temperature)
            .input(InputParam::Items(vec![
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::System)
                        .content(system)
                        .build()?,
                ),
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::User)
                        .content(user)
                        .build()?,
                ),
            ]))
            .build()?;

        let response = self.client.responses().create(request).await?;
        reply_text(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    struct ScriptedCompleter {
        reply: Result<String>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedCompleter {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(Error::custom(message)),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().expect("lock").len()
        }
    }

    impl Completer for ScriptedCompleter {
        async fn complete(&self, system: &str, user: &str) -> Result<String> {
            self.prompts
                .lock()
                .expect("lock")
                .push((system.to_string(), user.to_string()));
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(e) => Err(Error::custom(e)),
            }
        }
    }

    fn response_with_output(output: Value) -> Response {
        serde_json::from_value(json!({
            "id": "resp_67ccd2bed1ec8190b14f964abc054267",
            "object": "response",
            "created_at": 1741476542,
            "status": "completed",
            "error": null,
            "incomplete_details": null,
            "instructions": null,
            "max_output_tokens": null,
            "model": "gpt-4-0613",
            "output": output,
            "parallel_tool_calls": true,
            "previous_response_id": null,
            "reasoning": {"effort": null, "summary": null},
            "service_tier": "default",
            "store": true,
            "temperature": 0.7,
            "text": {"format": {"type": "text"}, "verbosity": "medium"},
            "tool_choice": "auto",
            "tools": [],
            "top_p": 1.0,
            "truncation": "disabled",
            "usage": {
                "input_tokens": 36,
                "input_tokens_details": {"cached_tokens": 0},
                "output_tokens": 87,
                "output_tokens_details": {"reasoning_tokens": 0},
                "total_tokens": 123
            },
            "user": null,
            "metadata": {}
        }))
        .expect("response fixture deserializes")
    }

    fn message(id: &str, parts: &[&str]) -> Value {
        let content: Vec<Value> = parts
            .iter()
            .map(|text| {
                json!({
                    "type": "output_text",
                    "text": text,
                    "annotations": [],
                    "logprobs": []
                })
            })
            .collect();
        json!({
            "type": "message",
            "id": id,
            "status": "completed",
            "role": "assistant",
            "content": content
        })
    }

    fn transcripts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reply_text_reads_first_message_after_reasoning() {
        let response = response_with_output(json!([
            {"type": "reasoning", "id": "rs_1", "summary": []},
            message("msg_1", &["123", ".45"]),
            message("msg_2", &["999"])
        ]));

        assert_eq!(reply_text(response).expect("has a message"), "123.45");
    }

    #[test]
    fn reply_text_without_message_is_an_error() {
        let response = response_with_output(json!([
            {"type": "reasoning", "id": "rs_1", "summary": []}
        ]));

        assert!(reply_text(response).is_err());
    }

    #[test]
    fn combine_skips_empty_entries() {
        assert_eq!(
            combine_transcripts(&transcripts(&["alpha", "", "beta"])),
            Some("alpha beta".to_string())
        );
        assert_eq!(combine_transcripts(&transcripts(&["", ""])), None);
        assert_eq!(combine_transcripts(&[]), None);
    }

    #[test]
    fn parse_accepts_surrounding_whitespace() {
        assert_eq!(parse_prediction("  123.45\n"), Ok(123.45));
        assert_eq!(parse_prediction("-7"), Ok(-7.0));
    }

    #[test]
    fn parse_accepts_non_finite_values() {
        assert!(parse_prediction("NaN").expect("nan parses").is_nan());
        assert_eq!(parse_prediction("inf"), Ok(f64::INFINITY));
    }

    #[test]
    fn parse_rejects_partial_numbers() {
        assert_eq!(
            parse_prediction("approximately 100"),
            Err(PredictionFailure::Unparseable("approximately 100".to_string()))
        );
        assert!(parse_prediction("100 USD").is_err());
        assert!(parse_prediction("$100").is_err());
        assert!(parse_prediction("").is_err());
    }

    #[tokio::test]
    async fn no_transcripts_skips_the_request() {
        let service = PredictionService::new(ScriptedCompleter::replying("1.0"));
        assert_eq!(
            service.predict(&transcripts(&["", ""])).await,
            Prediction::NoTranscripts
        );
        assert_eq!(service.completer.calls(), 0);
    }

    #[tokio::test]
    async fn builds_the_two_message_prompt() {
        let service = PredictionService::new(ScriptedCompleter::replying("123.45"));
        let prediction = service.predict(&transcripts(&["up", "only"])).await;
        assert_eq!(prediction, Prediction::Price(123.45));

        let prompts = service.completer.prompts.lock().expect("lock");
        let (system, user) = &prompts[0];
        assert_eq!(system, "You are a financial analyst.");
        assert_eq!(
            user,
            "Based on the following transcripts, predict the stock price in 24 hours:\nup only\nProvide only a single numerical value as the prediction."
        );
    }

    #[tokio::test]
    async fn unparseable_reply_fails() {
        let service = PredictionService::new(ScriptedCompleter::replying("approximately 100"));
        assert!(matches!(
            service.predict(&transcripts(&["text"])).await,
            Prediction::Failed(PredictionFailure::Unparseable(_))
        ));
    }

    #[tokio::test]
    async fn request_error_fails() {
        let service = PredictionService::new(ScriptedCompleter::failing("401 Unauthorized"));
        assert_eq!(
            service.predict(&transcripts(&["text"])).await,
            Prediction::Failed(PredictionFailure::Request("401 Unauthorized".to_string()))
        );
    }
}
