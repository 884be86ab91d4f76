//! Messaging endpoints for direct messages.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use beanbook_common::AppResult;
use beanbook_db::entities::message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create messages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_conversations))
        .route("/", post(send_message))
        .route("/conversation/{friend_id}", get(get_conversation))
        .route("/{message_id}", delete(delete_message))
}

/// Message response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub text: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<message::Model> for MessageResponse {
    fn from(msg: message::Model) -> Self {
        Self {
            id: msg.id,
            sender_id: msg.sender_id,
            receiver_id: msg.receiver_id,
            text: msg.text,
            is_read: msg.is_read,
            created_at: msg.created_at.into(),
        }
    }
}

/// Send message request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub receiver_id: String,
    #[serde(default)]
    pub text: String,
}

/// Send a message to a friend.
async fn send_message(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    info!(sender = %user.id, receiver = %req.receiver_id, "Sending message");

    let message = state
        .messaging_service
        .send_message(&user.id, &req.receiver_id, &req.text)
        .await?;

    Ok(ApiResponse::ok(message.into()))
}

/// Fetch the conversation with a friend.
///
/// Reading the thread marks the friend's messages as read.
async fn get_conversation(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(friend_id): Path<String>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    let messages = state
        .messaging_service
        .get_conversation(&user.id, &friend_id)
        .await?;

    Ok(ApiResponse::ok(
        messages.into_iter().map(MessageResponse::from).collect(),
    ))
}

/// Conversation summary response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub friend_id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub unread_count: u64,
    pub last_message_at: Option<DateTime<Utc>>,
}

/// List one summary per friend, most recently active first.
async fn list_conversations(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ConversationResponse>>> {
    let summaries = state.messaging_service.list_conversations(&user.id).await?;

    let conversations = summaries
        .into_iter()
        .map(|s| ConversationResponse {
            friend_id: s.partner.id,
            name: s.partner.name,
            avatar_url: s.partner.avatar_url,
            unread_count: s.unread_count,
            last_message_at: s.last_message_at.map(Into::into),
        })
        .collect();

    Ok(ApiResponse::ok(conversations))
}

/// Delete a message. Only the sender may do this.
async fn delete_message(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(user = %user.id, message = %message_id, "Deleting message");

    state
        .messaging_service
        .delete_message(&user.id, &message_id)
        .await?;

    Ok(ApiResponse::ok(()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_serialization() {
        let response = MessageResponse {
            id: "m1".to_string(),
            sender_id: "u1".to_string(),
            receiver_id: "u2".to_string(),
            text: "hi".to_string(),
            is_read: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"text\":\"hi\""));
        assert!(json.contains("\"isRead\":false"));
    }

    #[test]
    fn test_conversation_without_messages_serializes_null_timestamp() {
        let response = ConversationResponse {
            friend_id: "u2".to_string(),
            name: "Mina".to_string(),
            avatar_url: None,
            unread_count: 0,
            last_message_at: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"lastMessageAt\":null"));
        assert!(json.contains("\"unreadCount\":0"));
    }
}
