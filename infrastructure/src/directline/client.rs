//! Direct Line REST client
//!
//! One method per endpoint, each a single round trip. Status codes other
//! than the documented success code are errors carrying the response body.

use super::error::{DirectLineError, Result};
use super::protocol::{OutboundActivity, RoutingProfile, TokenResponse};
use botbatch_domain::{Conversation, ConversationStarted, Token};
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Service endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectLineEndpoints {
    pub token_url: String,
    pub conversations_url: String,
}

impl DirectLineEndpoints {
    pub fn activities_url(&self, conversation_id: &str) -> String {
        format!(
            "{}/{}/activities",
            self.conversations_url.trim_end_matches('/'),
            conversation_id
        )
    }
}

pub struct DirectLineClient {
    http: reqwest::Client,
    endpoints: DirectLineEndpoints,
    secret: String,
    profile: RoutingProfile,
}

impl DirectLineClient {
    pub fn new(
        endpoints: DirectLineEndpoints,
        secret: impl Into<String>,
        profile: RoutingProfile,
        request_timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            http,
            endpoints,
            secret: secret.into(),
            profile,
        })
    }

    pub fn endpoints(&self) -> &DirectLineEndpoints {
        &self.endpoints
    }

    /// `POST token_url` with the bot secret. Expects 200 `{token}`.
    pub async fn generate_token(&self) -> Result<Token> {
        let response = self
            .http
            .post(&self.endpoints.token_url)
            .bearer_auth(&self.secret)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let body: TokenResponse = expect_status(response, StatusCode::OK).await?.json().await?;
        debug!("Direct Line token issued (expires in {:?}s)", body.expires_in);

        body.token
            .filter(|token| !token.is_empty())
            .map(Token::new)
            .ok_or_else(|| DirectLineError::UnexpectedResponse("token response has no token".into()))
    }

    /// `POST conversations_url` with a conversation token. Expects 201.
    pub async fn start_conversation(&self, token: &Token) -> Result<ConversationStarted> {
        let response = self
            .http
            .post(&self.endpoints.conversations_url)
            .bearer_auth(token.as_str())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let started = expect_status(response, StatusCode::CREATED)
            .await?
            .json()
            .await?;
        Ok(started)
    }

    /// Post a user message into `conversation`. Expects 200.
    pub async fn post_activity(&self, conversation: &Conversation, text: &str) -> Result<()> {
        let activity = OutboundActivity::message(&self.profile, conversation.id(), text, Utc::now());
        let response = self
            .http
            .post(self.endpoints.activities_url(conversation.id()))
            .bearer_auth(conversation.token().as_str())
            .json(&activity)
            .send()
            .await?;
        expect_status(response, StatusCode::OK).await?;
        Ok(())
    }
}

async fn expect_status(response: Response, expected: StatusCode) -> Result<Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DirectLineError::Status {
        status: status.as_u16(),
        body,
    })
}
