//! `inbox.*` commands.
//!
//! The two listing commands take an optional `paginationLimit`; when the host
//! omits it the configured default (`BridgeConfig::inbox_pagination_limit`)
//! is used.  The per-message commands all take a `messageId` and reply with
//! `null`.

use serde_json::Value;

use super::encode;
use crate::application::error::BridgeError;
use crate::application::routes::{
    HandlerFuture, Route, RouteTable, RouteTableError, SessionCall, INBOX_ARCHIVE_MESSAGE,
    INBOX_CLICK_MESSAGE, INBOX_GET_ARCHIVED_MESSAGES, INBOX_GET_MESSAGES, INBOX_GET_MESSAGE_BY_ID,
    INBOX_GET_UNREAD_MESSAGE_COUNT, INBOX_OPEN_MESSAGE, INBOX_READ_ALL_MESSAGES,
    INBOX_READ_MESSAGE, INBOX_UNREAD_MESSAGE,
};

pub fn register(table: &mut RouteTable) -> Result<(), RouteTableError> {
    table.register(INBOX_GET_MESSAGES, Route::Session(get_messages))?;
    table.register(INBOX_GET_ARCHIVED_MESSAGES, Route::Session(get_archived_messages))?;
    table.register(
        INBOX_GET_UNREAD_MESSAGE_COUNT,
        Route::Session(get_unread_message_count),
    )?;
    table.register(INBOX_GET_MESSAGE_BY_ID, Route::Session(get_message_by_id))?;
    table.register(INBOX_CLICK_MESSAGE, Route::Session(click_message))?;
    table.register(INBOX_UNREAD_MESSAGE, Route::Session(unread_message))?;
    table.register(INBOX_READ_MESSAGE, Route::Session(read_message))?;
    table.register(INBOX_OPEN_MESSAGE, Route::Session(open_message))?;
    table.register(INBOX_ARCHIVE_MESSAGE, Route::Session(archive_message))?;
    table.register(INBOX_READ_ALL_MESSAGES, Route::Session(read_all_messages))
}

/// Page size and start cursor shared by both listing commands.
fn page_request(call: &SessionCall) -> Result<(u32, Option<String>), BridgeError> {
    let requested: Option<u32> = call.params.optional("paginationLimit")?;
    let cursor: Option<String> = call.params.optional("startCursor")?;
    Ok((call.config.page_limit_or_default(requested), cursor))
}

fn get_messages(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let (limit, cursor) = page_request(&call)?;
        let page = call
            .session
            .inbox()
            .get_messages(limit, cursor.as_deref())
            .await?;
        encode(&page)
    })
}

fn get_archived_messages(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let (limit, cursor) = page_request(&call)?;
        let page = call
            .session
            .inbox()
            .get_archived_messages(limit, cursor.as_deref())
            .await?;
        encode(&page)
    })
}

fn get_unread_message_count(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let count = call.session.inbox().get_unread_message_count().await?;
        Ok(Value::from(count))
    })
}

fn get_message_by_id(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let message_id: String = call.params.require("messageId")?;
        let message = call.session.inbox().get_message(&message_id).await?;
        encode(&message)
    })
}

fn click_message(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let message_id: String = call.params.require("messageId")?;
        let tracking_id: String = call.params.require("trackingId")?;
        call.session.inbox().click(&message_id, &tracking_id).await?;
        Ok(Value::Null)
    })
}

fn unread_message(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let message_id: String = call.params.require("messageId")?;
        call.session.inbox().unread(&message_id).await?;
        Ok(Value::Null)
    })
}

fn read_message(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let message_id: String = call.params.require("messageId")?;
        call.session.inbox().read(&message_id).await?;
        Ok(Value::Null)
    })
}

fn open_message(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let message_id: String = call.params.require("messageId")?;
        call.session.inbox().open(&message_id).await?;
        Ok(Value::Null)
    })
}

fn archive_message(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let message_id: String = call.params.require("messageId")?;
        call.session.inbox().archive(&message_id).await?;
        Ok(Value::Null)
    })
}

fn read_all_messages(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        call.session.inbox().read_all().await?;
        Ok(Value::Null)
    })
}
