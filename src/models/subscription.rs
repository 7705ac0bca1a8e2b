// src/models/subscription.rs

use serde::Deserialize;

/// DTO identifying a (user, post) subscription pair. Used as a JSON body on
/// create/drain and as query parameters on check/delete.
#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    pub user_id: String,
    pub post_id: String,
}
