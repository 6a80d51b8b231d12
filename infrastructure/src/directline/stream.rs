//! WebSocket activity stream
//!
//! Wraps the conversation's `streamUrl` socket as a [`ReplyStream`].
//! Dropping the stream drops the TCP connection; [`ReplyStream::close`]
//! additionally sends a close frame.

use super::error::Result;
use async_trait::async_trait;
use botbatch_application::ports::bot_gateway::{GatewayError, ReplyStream};
use botbatch_domain::Frame;
use futures::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Upper bound on sending our close frame to an unresponsive peer.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct WebSocketReplyStream {
    socket: Option<Socket>,
    conversation_id: String,
}

impl WebSocketReplyStream {
    pub async fn connect(stream_url: &str, conversation_id: impl Into<String>) -> Result<Self> {
        let (socket, _response) = connect_async(stream_url).await?;
        let conversation_id = conversation_id.into();
        debug!("Activity stream open for conversation {}", conversation_id);
        Ok(Self {
            socket: Some(socket),
            conversation_id,
        })
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }
}

fn to_frame(message: WsMessage) -> Frame {
    match message {
        WsMessage::Text(text) => Frame::Text(text),
        WsMessage::Binary(bytes) => Frame::Binary(bytes),
        WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => Frame::Control,
        WsMessage::Close(_) => Frame::Close,
    }
}

#[async_trait]
impl ReplyStream for WebSocketReplyStream {
    async fn next_frame(&mut self) -> std::result::Result<Option<Frame>, GatewayError> {
        let Some(socket) = self.socket.as_mut() else {
            return Ok(None);
        };
        match socket.next().await {
            Some(Ok(message)) => Ok(Some(to_frame(message))),
            Some(Err(e)) => Err(GatewayError::Transport(e.to_string())),
            None => Ok(None),
        }
    }

    async fn close(&mut self) {
        let Some(mut socket) = self.socket.take() else {
            return;
        };
        match tokio::time::timeout(CLOSE_TIMEOUT, socket.close(None)).await {
            Ok(Ok(())) => debug!("Activity stream closed for {}", self.conversation_id),
            Ok(Err(e)) => debug!(
                "Activity stream for {} closed uncleanly: {}",
                self.conversation_id, e
            ),
            Err(_) => debug!(
                "Timed out closing activity stream for {}",
                self.conversation_id
            ),
        }
    }
}
