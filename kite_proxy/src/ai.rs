//! Chat-completion client used for trading-signal analysis.
use kite_common::net::url;
use kite_common::signal::{AiSignal, MarketSnapshot, SYSTEM_PROMPT, build_prompt, parse_signal};
use kite_common::{ProxyError, Result};
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Option<String>,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

pub struct AiClient {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
    model: String,
}

impl AiClient {
    pub fn new(
        client: Client,
        base_url: Option<String>,
        api_key: Option<String>,
        model: &str,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model: model.to_string(),
        }
    }

    /// Send one system + user exchange and return the reply text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let (Some(base_url), Some(api_key)) = (self.base_url.as_deref(), self.api_key.as_deref())
        else {
            return Err(ProxyError::NotConfigured("AI service"));
        };

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::new("system", SYSTEM_PROMPT),
                ChatMessage::new("user", prompt),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let endpoint = url(base_url, "/chat/completions");
        debug!("POST {} model={}", endpoint, self.model);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("AI API error: {}", text);
            return Err(ProxyError::upstream(
                status.as_u16(),
                format!("AI service error: {}", status.as_u16()),
            ));
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProxyError::MalformedSignal(String::from("empty completion")))
    }

    /// Ask the model for a trading signal on `snapshot`.
    pub async fn analyze(&self, snapshot: &MarketSnapshot) -> Result<AiSignal> {
        info!("Calling AI for crypto analysis: {}", snapshot.symbol);
        let reply = self.complete(&build_prompt(snapshot)).await?;
        info!("AI response received for {}", snapshot.symbol);
        parse_signal(&reply)
    }
}
