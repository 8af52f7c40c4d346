//! OpenAI-compatible chat-completions adapter
//!
//! Every operation is one `POST {base_url}/chat/completions` with a system
//! and a user message. Replies are parsed with [`super::parsing`].

use super::parsing::{parse_candidates, parse_response};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thinktank_application::{AiService, AiServiceError, ThoughtRequest};
use thinktank_domain::{Agent, AgentResponse, ProjectContext, PromptTemplate, ThoughtCandidate};
use tracing::{debug, warn};

/// Connection settings for [`HttpAiService`]
#[derive(Debug, Clone)]
pub struct HttpProviderSettings {
    /// Endpoint root, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f64,
    /// Transport-level timeout for one request
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// AI service that talks to an OpenAI-compatible endpoint
pub struct HttpAiService {
    client: reqwest::Client,
    settings: HttpProviderSettings,
}

impl HttpAiService {
    pub fn new(settings: HttpProviderSettings) -> Result<Self, AiServiceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AiServiceError::Unavailable(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, AiServiceError> {
        let body = json!({
            "model": self.settings.model,
            "temperature": self.settings.temperature,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(map_transport_error)?;

        if !(200..300).contains(&status) {
            warn!("Chat completion failed with HTTP {}", status);
            return Err(map_status(status, &text));
        }

        let completion: ChatCompletion = serde_json::from_str(&text)
            .map_err(|e| AiServiceError::MalformedOutput(format!("invalid completion: {}", e)))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiServiceError::MalformedOutput("completion has no content".to_string()))?;

        debug!("Chat completion returned {} bytes", content.len());
        Ok(content)
    }
}

fn map_transport_error(e: reqwest::Error) -> AiServiceError {
    if e.is_timeout() {
        AiServiceError::Timeout
    } else if e.is_connect() {
        AiServiceError::Unavailable(e.to_string())
    } else {
        AiServiceError::RequestFailed(e.to_string())
    }
}

/// Map a non-success HTTP status to a typed failure.
fn map_status(status: u16, body: &str) -> AiServiceError {
    let body = thinktank_domain::util::truncate_str(body, 200);
    match status {
        429 => AiServiceError::QuotaExceeded(body.to_string()),
        408 | 504 => AiServiceError::Timeout,
        500..=599 => AiServiceError::Unavailable(format!("HTTP {}: {}", status, body)),
        _ => AiServiceError::RequestFailed(format!("HTTP {}: {}", status, body)),
    }
}

#[async_trait]
impl AiService for HttpAiService {
    async fn generate_thoughts(
        &self,
        context: &ProjectContext,
        request: ThoughtRequest<'_>,
        agent: &Agent,
    ) -> Result<Vec<ThoughtCandidate>, AiServiceError> {
        let prompt = PromptTemplate::thought_prompt(
            request.user_input,
            request.parent,
            context,
            request.candidates,
        );
        let reply = self.chat(&PromptTemplate::thought_system(agent), &prompt).await?;
        let mut candidates = parse_candidates(&reply)?;
        candidates.truncate(request.candidates);
        Ok(candidates)
    }

    async fn generate_response(
        &self,
        prompt: &str,
        context: &ProjectContext,
    ) -> Result<AgentResponse, AiServiceError> {
        let user = if context.is_empty() {
            prompt.to_string()
        } else {
            format!("{}\n\nProject context:\n{}", prompt, context.to_prompt_context(8))
        };
        let reply = self
            .chat("You are a careful, concise assistant.", &user)
            .await?;
        parse_response(&reply)
    }

    async fn optimize_response(
        &self,
        response: &AgentResponse,
        feedback: &str,
        _context: &ProjectContext,
    ) -> Result<AgentResponse, AiServiceError> {
        let reply = self
            .chat(
                PromptTemplate::optimization_system(),
                &PromptTemplate::optimization_prompt(response, feedback),
            )
            .await?;
        let improved = parse_response(&reply)?;
        Ok(response.revised(improved.content, improved.confidence))
    }
}
