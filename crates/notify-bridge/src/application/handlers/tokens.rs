//! `tokens.*` commands: push-token registration.

use serde_json::Value;

use notify_core::{Device, Params};

use crate::application::routes::{
    HandlerFuture, Route, RouteTable, RouteTableError, SessionCall, TOKENS_DELETE_USER_TOKEN,
    TOKENS_PUT_USER_TOKEN,
};

pub fn register(table: &mut RouteTable) -> Result<(), RouteTableError> {
    table.register(TOKENS_PUT_USER_TOKEN, Route::Session(put_user_token))?;
    table.register(TOKENS_DELETE_USER_TOKEN, Route::Session(delete_user_token))
}

fn put_user_token(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let token: String = call.params.require("token")?;
        let provider: String = call.params.require("provider")?;
        // The descriptor is optional; an absent one registers a blank device.
        let device = match call.params.optional::<Params>("device")? {
            Some(nested) => Device::from_params(&nested)?,
            None => Device::default(),
        };

        call.session
            .tokens()
            .put_user_token(&token, &provider, &device)
            .await?;
        Ok(Value::Null)
    })
}

fn delete_user_token(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let token: String = call.params.require("token")?;
        call.session.tokens().delete_user_token(&token).await?;
        Ok(Value::Null)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::BridgeError;
    use crate::application::test_support::{session_call, RecordingClient, SdkCall};
    use notify_core::SdkError;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_put_token_with_device_forwards_descriptor() {
        // Arrange
        let client = Arc::new(RecordingClient::default());
        let call = session_call(
            Arc::clone(&client),
            json!({
                "token": "abc",
                "provider": "apn",
                "device": { "platform": "ios", "model": "iPhone15,2" }
            }),
        );

        // Act
        let value = put_user_token(call).await.unwrap();

        // Assert
        assert_eq!(value, Value::Null);
        let expected_device = Device {
            platform: Some("ios".to_string()),
            model: Some("iPhone15,2".to_string()),
            ..Device::default()
        };
        assert_eq!(
            client.recorded(),
            vec![SdkCall::PutToken {
                token: "abc".to_string(),
                provider: "apn".to_string(),
                device: expected_device,
            }]
        );
    }

    #[tokio::test]
    async fn test_put_token_without_device_uses_blank_descriptor() {
        let client = Arc::new(RecordingClient::default());
        let call = session_call(
            Arc::clone(&client),
            json!({ "token": "abc", "provider": "firebase-fcm" }),
        );

        put_user_token(call).await.unwrap();

        assert!(matches!(
            &client.recorded()[0],
            SdkCall::PutToken { device, .. } if *device == Device::default()
        ));
    }

    #[tokio::test]
    async fn test_put_token_with_non_object_device_is_invalid() {
        let client = Arc::new(RecordingClient::default());
        let call = session_call(
            Arc::clone(&client),
            json!({ "token": "abc", "provider": "apn", "device": "ios" }),
        );

        let err = put_user_token(call).await.unwrap_err();

        assert_eq!(err, BridgeError::InvalidParameter("device".to_string()));
        assert!(client.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_put_token_requires_provider() {
        let client = Arc::new(RecordingClient::default());
        let call = session_call(Arc::clone(&client), json!({ "token": "abc" }));

        let err = put_user_token(call).await.unwrap_err();

        assert_eq!(err, BridgeError::MissingParameter("provider".to_string()));
    }

    #[tokio::test]
    async fn test_delete_token_relays_sdk_failure() {
        // Arrange
        let client = Arc::new(RecordingClient::failing(SdkError::Http {
            status: 500,
            message: "server error".to_string(),
        }));
        let call = session_call(Arc::clone(&client), json!({ "token": "abc" }));

        // Act
        let err = delete_user_token(call).await.unwrap_err();

        // Assert
        assert!(matches!(
            err,
            BridgeError::OperationFailed(SdkError::Http { status: 500, .. })
        ));
        assert_eq!(client.recorded(), vec![SdkCall::DeleteToken("abc".to_string())]);
    }
}
