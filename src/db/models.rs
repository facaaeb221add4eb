use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted quote. `id` is assigned by the store on insert and stable for
/// the row's lifetime; `text` and `author` are non-empty (enforced at the API
/// layer before insert/update).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub author: String,
}
