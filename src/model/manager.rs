use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Manager {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "bob")]
    pub username: String,

    #[schema(example = "Bob Karim")]
    pub name: String,
}
