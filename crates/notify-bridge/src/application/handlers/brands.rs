//! `brands.*` commands.

use super::encode;
use crate::application::routes::{
    HandlerFuture, Route, RouteTable, RouteTableError, SessionCall, BRANDS_GET_BRAND,
};

pub fn register(table: &mut RouteTable) -> Result<(), RouteTableError> {
    table.register(BRANDS_GET_BRAND, Route::Session(get_brand))
}

fn get_brand(call: SessionCall) -> HandlerFuture {
    Box::pin(async move {
        let brand_id: String = call.params.require("brandId")?;
        let brand = call.session.brands().get_brand(&brand_id).await?;
        encode(&brand)
    })
}
