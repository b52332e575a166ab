//! `preferences.*` commands.
//!
//! Status and channel strings are parsed tolerantly: a value this build does
//! not know becomes `UNKNOWN` / `unknown` and is still forwarded.

use serde_json::Value;

use notify_core::TopicUpdate;

use super::encode;
use crate::application::routes::{
    HandlerFuture, Route, RouteTable, RouteTableError, SessionCall,
    PREFERENCES_GET_USER_PREFERENCES, PREFERENCES_GET_USER_PREFERENCE_TOPIC,
    PREFERENCES_PUT_USER_PREFERENCE_TOPIC,
};

pub fn register(table: &mut RouteTable) -> Result<(), RouteTableError> {
    table.register(
        PREFERENCES_GET_USER_PREFERENCES,
        Route::Session(get_user_preferences),
    )?;
    table.register(
        PREFERENCES_GET_USER_PREFERENCE_TOPIC,
        Route::Session(get_user_preference_topic),
    )?;
    table.register(
        PREFERENCES_PUT_USER_PREFERENCE_TOPIC,
        Route::Session(put_user_preference_topic),
    )
}

fn get_user_preferences(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let cursor: Option<String> = call.params.optional("paginationCursor")?;
        let preferences = call
            .session
            .preferences()
            .get_user_preferences(cursor.as_deref())
            .await?;
        encode(&preferences)
    })
}

fn get_user_preference_topic(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let topic_id: String = call.params.require("topicId")?;
        let topic = call
            .session
            .preferences()
            .get_user_preference_topic(&topic_id)
            .await?;
        encode(&topic)
    })
}

fn put_user_preference_topic(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let topic_id: String = call.params.require("topicId")?;
        let status: String = call.params.require("status")?;
        let has_custom_routing: bool = call.params.require("hasCustomRouting")?;
        let custom_routing: Vec<String> = call.params.require("customRouting")?;

        let update = TopicUpdate::from_raw(topic_id, &status, has_custom_routing, &custom_routing);
        call.session
            .preferences()
            .put_user_preference_topic(&update)
            .await?;
        Ok(Value::Null)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::BridgeError;
    use crate::application::test_support::{session_call, RecordingClient, SdkCall};
    use notify_core::{PreferenceChannel, PreferenceStatus};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_preferences_forwards_cursor() {
        let client = Arc::new(RecordingClient::default());
        let call = session_call(Arc::clone(&client), json!({ "paginationCursor": "c2" }));

        get_user_preferences(call).await.unwrap();

        assert_eq!(
            client.recorded(),
            vec![SdkCall::GetPreferences(Some("c2".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_get_topic_with_numeric_id_is_invalid() {
        // Arrange
        let client = Arc::new(RecordingClient::default());
        let call = session_call(Arc::clone(&client), json!({ "topicId": 42 }));

        // Act
        let err = get_user_preference_topic(call).await.unwrap_err();

        // Assert
        assert_eq!(err, BridgeError::InvalidParameter("topicId".to_string()));
        assert!(client.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_get_topic_without_id_is_missing() {
        let client = Arc::new(RecordingClient::default());
        let call = session_call(Arc::clone(&client), json!({}));

        let err = get_user_preference_topic(call).await.unwrap_err();

        assert_eq!(err, BridgeError::MissingParameter("topicId".to_string()));
    }

    #[tokio::test]
    async fn test_get_topic_encodes_status_strings() {
        let client = Arc::new(RecordingClient::default());
        let call = session_call(Arc::clone(&client), json!({ "topicId": "t1" }));

        let value = get_user_preference_topic(call).await.unwrap();

        assert_eq!(value["topicId"], "t1");
        assert_eq!(value["status"], "OPTED_IN");
    }

    #[tokio::test]
    async fn test_put_topic_forwards_unknown_status_and_channels() {
        // Arrange
        let client = Arc::new(RecordingClient::default());
        let call = session_call(
            Arc::clone(&client),
            json!({
                "topicId": "t1",
                "status": "SOMETHING_NEW",
                "hasCustomRouting": true,
                "customRouting": ["push", "carrier_pigeon"]
            }),
        );

        // Act
        let value = put_user_preference_topic(call).await.unwrap();

        // Assert
        assert_eq!(value, Value::Null);
        let SdkCall::PutTopic(update) = &client.recorded()[0] else {
            panic!("expected a PutTopic call");
        };
        assert_eq!(update.topic_id, "t1");
        assert_eq!(update.status, PreferenceStatus::Unknown);
        assert!(update.has_custom_routing);
        assert_eq!(
            update.custom_routing,
            vec![PreferenceChannel::Push, PreferenceChannel::Unknown]
        );
    }

    #[tokio::test]
    async fn test_put_topic_rejects_non_string_routing_entry() {
        let client = Arc::new(RecordingClient::default());
        let call = session_call(
            Arc::clone(&client),
            json!({
                "topicId": "t1",
                "status": "OPTED_IN",
                "hasCustomRouting": false,
                "customRouting": ["push", 7]
            }),
        );

        let err = put_user_preference_topic(call).await.unwrap_err();

        assert_eq!(err, BridgeError::InvalidParameter("customRouting".to_string()));
        assert!(client.recorded().is_empty());
    }
}
