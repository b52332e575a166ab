//! `tracking.*` commands.
//!
//! Unlike preference enums, the event name is parsed strictly: an unmapped
//! string fails with `InvalidParameter("event")` and nothing is posted.

use serde_json::Value;

use notify_core::TrackingEvent;

use crate::application::error::BridgeError;
use crate::application::routes::{
    HandlerFuture, Route, RouteTable, RouteTableError, SessionCall, TRACKING_POST_TRACKING_URL,
};

pub fn register(table: &mut RouteTable) -> Result<(), RouteTableError> {
    table.register(TRACKING_POST_TRACKING_URL, Route::Session(post_tracking_url))
}

fn post_tracking_url(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let url: String = call.params.require("url")?;
        let raw_event: String = call.params.require("event")?;
        let event: TrackingEvent = raw_event
            .parse()
            .map_err(|_| BridgeError::InvalidParameter("event".to_string()))?;

        call.session.tracking().post_tracking_url(&url, event).await?;
        Ok(Value::Null)
    })
}
