use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "username": "alice",
        "name": "Alice Rahman",
        "email": "alice@company.com",
        "manager_id": 1
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "alice")]
    pub username: String,

    #[schema(example = "Alice Rahman")]
    pub name: String,

    #[schema(example = "alice@company.com")]
    pub email: String,

    #[schema(example = 1)]
    pub manager_id: i64,
}
