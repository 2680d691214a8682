use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    model::{manager::Manager, role::Role},
    models::{CredentialSql, LoginReqDto, RegisterReqDto, TokenType},
};
use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use serde::Serialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, error, info, instrument};

use crate::utils::username_cache;
use crate::utils::username_filter;

// auth end points

fn is_unique_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        // 2067 = UNIQUE constraint, 1555 = UNIQUE on the rowid alias
        matches!(db_err.code().as_deref(), Some("2067") | Some("1555"))
    } else {
        false
    }
}

/// true  => username AVAILABLE
/// false => username TAKEN
///
/// Uniqueness is global: a username held by a manager blocks an employee
/// registration and vice versa.
pub async fn is_username_available(username: &str, pool: &SqlitePool) -> bool {
    // 1️⃣ Cuckoo filter — fast negative
    if !username_filter::might_exist(username) {
        return true;
    }

    // 2️⃣ Moka cache — fast positive
    if username_cache::is_taken(username).await {
        return false;
    }

    // 3️⃣ Database fallback, both identity tables
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM managers WHERE username = ? LIMIT 1)
            OR EXISTS(SELECT 1 FROM employees WHERE username = ? LIMIT 1)
        "#,
    )
    .bind(username)
    .bind(username)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe

    !exists
}

async fn email_taken(email: &str, pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM managers WHERE email = ? LIMIT 1)
            OR EXISTS(SELECT 1 FROM employees WHERE email = ? LIMIT 1)
        "#,
    )
    .bind(email)
    .bind(email)
    .fetch_one(pool)
    .await
}

/// User registration handler
pub async fn register(
    payload: web::Json<RegisterReqDto>,
    pool: web::Data<SqlitePool>,
) -> impl Responder {
    let username = payload.username.trim();
    let name = payload.name.trim();
    let email = payload.email.trim();

    if username.is_empty() || payload.password.is_empty() || name.is_empty() || email.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "error": "username, password, name and email must not be empty"
        }));
    }

    if !is_username_available(username, pool.get_ref()).await {
        return HttpResponse::Conflict().json(json!({
            "error": "Username or email already exists"
        }));
    }

    match email_taken(email, pool.get_ref()).await {
        Ok(true) => {
            return HttpResponse::Conflict().json(json!({
                "error": "Username or email already exists"
            }));
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error while checking email");
            return HttpResponse::InternalServerError().finish();
        }
    }

    let hashed = hash_password(&payload.password);

    let result = if payload.is_manager {
        sqlx::query(
            r#"INSERT INTO managers (username, name, email, password) VALUES (?, ?, ?, ?)"#,
        )
        .bind(username)
        .bind(name)
        .bind(email)
        .bind(&hashed)
        .execute(pool.get_ref())
        .await
    } else {
        // Employees must report to an existing manager.
        let manager_username = match payload.manager_username.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m,
            _ => {
                return HttpResponse::BadRequest().json(json!({
                    "error": "manager_username is required for employee registration"
                }));
            }
        };

        let manager_id = match sqlx::query_scalar::<_, i64>(
            r#"SELECT id FROM managers WHERE username = ?"#,
        )
        .bind(manager_username)
        .fetch_optional(pool.get_ref())
        .await
        {
            Ok(Some(id)) => id,
            Ok(None) => {
                return HttpResponse::BadRequest().json(json!({
                    "error": "Unknown manager username"
                }));
            }
            Err(e) => {
                error!(error = %e, "Database error while resolving manager");
                return HttpResponse::InternalServerError().finish();
            }
        };

        sqlx::query(
            r#"INSERT INTO employees (username, name, email, password, manager_id) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(username)
        .bind(name)
        .bind(email)
        .bind(&hashed)
        .bind(manager_id)
        .execute(pool.get_ref())
        .await
    };

    match result {
        Ok(res) => {
            // keep filter and cache in sync with the store
            username_filter::insert(username);
            username_cache::mark_taken(username).await;

            let role = if payload.is_manager {
                Role::Manager
            } else {
                Role::Employee
            };

            HttpResponse::Created().json(json!({
                "id": res.last_insert_rowid(),
                "username": username,
                "role": role.as_str(),
            }))
        }
        Err(e) if is_unique_violation(&e) => HttpResponse::Conflict().json(json!({
            "error": "Username or email already exists"
        })),
        Err(e) => {
            error!(error = %e, "Failed to register user");
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to register user"
            }))
        }
    }
}

#[derive(Serialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    role: &'static str,
    user_id: i64,
}

#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().body("Username or password required");
    }

    debug!("Fetching credentials from database");

    // Managers are checked before employees; global username uniqueness
    // means at most one of the two lookups can match.
    let manager = match sqlx::query_as::<_, CredentialSql>(
        r#"SELECT id, password FROM managers WHERE username = ?"#,
    )
    .bind(&user.username)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "Database error while fetching manager");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let (role, credential) = match manager {
        Some(m) => (Role::Manager, m),
        None => {
            match sqlx::query_as::<_, CredentialSql>(
                r#"SELECT id, password FROM employees WHERE username = ?"#,
            )
            .bind(&user.username)
            .fetch_optional(pool.get_ref())
            .await
            {
                Ok(Some(e)) => (Role::Employee, e),
                Ok(None) => {
                    info!("Invalid credentials: user not found");
                    return HttpResponse::Unauthorized().body("Invalid credentials");
                }
                Err(e) => {
                    error!(error = %e, "Database error while fetching employee");
                    return HttpResponse::InternalServerError().finish();
                }
            }
        }
    };

    debug!("Verifying password");

    if let Err(e) = verify_password(&user.password, &credential.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    debug!("Generating access token");

    let access_token = generate_access_token(
        credential.id,
        user.username.clone(),
        role as u8,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    debug!("Generating refresh token");

    let (refresh_token, refresh_claims) = generate_refresh_token(
        credential.id,
        user.username.clone(),
        role as u8,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    debug!(
        user_id = credential.id,
        jti = %refresh_claims.jti,
        "Storing refresh token"
    );

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(credential.id)
    .bind(&refresh_claims.jti)
    .bind(refresh_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    debug!("Updating last_login_at");

    let last_login_sql = match role {
        Role::Manager => "UPDATE managers SET last_login_at = CURRENT_TIMESTAMP WHERE id = ?",
        Role::Employee => "UPDATE employees SET last_login_at = CURRENT_TIMESTAMP WHERE id = ?",
    };

    if let Err(e) = sqlx::query(last_login_sql)
        .bind(credential.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
        // intentionally not failing login
    }

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
        role: role.as_str(),
        user_id: credential.id,
    })
}

/// Session introspection for the caller's access token.
#[get("/me")]
pub async fn me(auth: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "user_id": auth.user_id,
        "username": auth.username,
        "role": auth.role.as_str(),
    }))
}

/// Registered managers, for the employee registration form.
pub async fn list_managers(pool: web::Data<SqlitePool>) -> actix_web::Result<impl Responder> {
    let managers = sqlx::query_as::<_, Manager>(
        r#"SELECT id, username, name FROM managers ORDER BY username"#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list managers");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(managers))
}

pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::Unauthorized().body("No token"),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::Unauthorized().body("Invalid token"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    // 🔍 find refresh token in DB
    let record = match sqlx::query_as::<_, (i64, i64, i64)>(
        r#"SELECT id, user_id, revoked FROM refresh_tokens WHERE jti = ?"#,
    )
    .bind(&claims.jti)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Database error while fetching refresh token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let (record_id, record_user_id) = match record {
        Some((id, user_id, revoked)) if revoked == 0 => (id, user_id),
        _ => return HttpResponse::Unauthorized().finish(),
    };

    // 🔥 revoke old refresh token
    if let Err(e) = sqlx::query(r#"UPDATE refresh_tokens SET revoked = 1 WHERE id = ?"#)
        .bind(record_id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to revoke refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    // 🔄 issue new refresh token
    let (new_refresh_token, new_claims) = generate_refresh_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(record_user_id)
    .bind(&new_claims.jti)
    .bind(new_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store rotated refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    // 🎫 new access token; its fresh jti also restarts the per-session
    // submission counter
    let access_token = generate_access_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    HttpResponse::Ok().json(serde_json::json!({
        "access_token": access_token,
        "refresh_token": new_refresh_token
    }))
}

pub async fn logout(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> impl Responder {
    // 1️⃣ extract Authorization header
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::NoContent().finish(),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::NoContent().finish(),
    };

    // 2️⃣ verify JWT
    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    // 3️⃣ only refresh tokens can logout
    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    // 4️⃣ revoke refresh token (idempotent)
    let _ = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = 1
        WHERE jti = ?
        "#,
    )
    .bind(&claims.jti)
    .execute(pool.get_ref())
    .await;

    // 5️⃣ success (even if token didn't exist)
    HttpResponse::NoContent().finish()
}
