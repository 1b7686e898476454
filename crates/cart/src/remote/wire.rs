//! Wire types for the remote cart write.
//!
//! Field names match the backend's JSON contract (camelCase, numeric price).

use rust_decimal::Decimal;
use serde::Serialize;

use marigold_core::UserId;

use crate::draft::CartItemDraft;

/// Body of `POST /cart`: the acting user paired with the product to add.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddItemRequest<'a> {
    user_id: &'a str,
    product: WireProduct<'a>,
}

#[derive(Debug, Serialize)]
struct WireProduct<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    image: Option<&'a str>,
    quantity: u32,
}

impl<'a> AddItemRequest<'a> {
    pub(crate) fn new(user_id: &'a UserId, draft: &'a CartItemDraft) -> Self {
        Self {
            user_id: user_id.as_str(),
            product: WireProduct {
                id: draft.product_id.as_str(),
                title: &draft.title,
                price: draft.unit_price,
                image: draft.image_ref.as_deref(),
                quantity: draft.quantity,
            },
        }
    }
}
