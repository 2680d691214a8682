use crate::auth::auth::AuthUser;
use crate::model::employee::Employee;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use sqlx::SqlitePool;
use tracing::error;

/// Roster for the calling manager: stable ids for each report, so clients
/// filter leave lists by id rather than by display name.
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "The caller's direct reports", body = [Employee]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, username, name, email, manager_id
        FROM employees
        WHERE manager_id = ?
        ORDER BY name
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, manager_id = auth.user_id, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(employees))
}
