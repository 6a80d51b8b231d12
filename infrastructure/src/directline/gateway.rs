//! Direct Line bot gateway implementation

use super::client::DirectLineClient;
use super::stream::WebSocketReplyStream;
use async_trait::async_trait;
use botbatch_application::ports::bot_gateway::{BotGateway, GatewayError, ReplyStream};
use botbatch_domain::{Conversation, Token};
use tracing::info;

/// Bot gateway speaking Direct Line v3 (REST bootstrap + WebSocket stream)
pub struct DirectLineGateway {
    client: DirectLineClient,
}

impl DirectLineGateway {
    pub fn new(client: DirectLineClient) -> Self {
        info!(
            "DirectLineGateway initialized ({})",
            client.endpoints().conversations_url
        );
        Self { client }
    }

    pub fn client(&self) -> &DirectLineClient {
        &self.client
    }
}

#[async_trait]
impl BotGateway for DirectLineGateway {
    async fn acquire_token(&self) -> Result<Token, GatewayError> {
        self.client
            .generate_token()
            .await
            .map_err(|e| GatewayError::Auth {
                status: e.status().unwrap_or_default(),
                message: e.to_string(),
            })
    }

    async fn start_conversation(&self, token: &Token) -> Result<Conversation, GatewayError> {
        let started = self
            .client
            .start_conversation(token)
            .await
            .map_err(|e| GatewayError::Conversation(e.to_string()))?;
        Conversation::from_started(started, token.clone())
            .map_err(|e| GatewayError::Conversation(e.to_string()))
    }

    async fn connect(
        &self,
        conversation: &Conversation,
    ) -> Result<Box<dyn ReplyStream>, GatewayError> {
        let stream = WebSocketReplyStream::connect(conversation.stream_url(), conversation.id())
            .await
            .map_err(|e| GatewayError::Connect(e.to_string()))?;
        Ok(Box::new(stream))
    }

    async fn send(&self, conversation: &Conversation, text: &str) -> Result<(), GatewayError> {
        self.client
            .post_activity(conversation, text)
            .await
            .map_err(|e| GatewayError::Send {
                status: e.status().unwrap_or_default(),
                body: e.to_string(),
            })
    }
}
