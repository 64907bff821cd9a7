use crate::{auth, config::Config, db::Db, errors::ApiError, models::user::User};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
}

/// Roughly the shape a mail router will accept: one @, a dotted domain, and
/// nothing outside the usual address characters.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    email
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '-' | '_'))
}

pub async fn register(
    db: web::Data<Db>,
    body: web::Json<RegisterReq>,
) -> Result<HttpResponse, ApiError> {
    if !is_valid_email(&body.email) {
        return Err(ApiError::BadRequest("please enter a valid email address".into()));
    }
    if body.password.is_empty() {
        return Err(ApiError::BadRequest("password is required".into()));
    }

    let hash = auth::hash_password(&body.password)?;
    let user_id = uuid::Uuid::new_v4().to_string();
    let res = sqlx::query(
        "INSERT INTO users(id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&user_id)
    .bind(&body.email)
    .bind(&hash)
    .bind(chrono::Utc::now())
    .execute(&db.0)
    .await;

    if let Err(e) = res {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.message().contains("UNIQUE") {
                return Err(ApiError::BadRequest(
                    "user with that email already exists".into(),
                ));
            }
        }
        return Err(e.into());
    }

    Ok(HttpResponse::Created().finish())
}

#[derive(Deserialize)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResp {
    pub token: String,
}

pub async fn login(
    cfg: web::Data<Config>,
    db: web::Data<Db>,
    body: web::Json<LoginReq>,
) -> Result<HttpResponse, ApiError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(&body.email)
    .fetch_optional(&db.0)
    .await?;

    // Unknown email and bad password are indistinguishable to the caller.
    let user = user.ok_or(ApiError::NotFound)?;
    if !auth::verify_password(&user.password_hash, &body.password) {
        return Err(ApiError::NotFound);
    }

    let token = auth::create_access_token(&user.email, &cfg)?;
    Ok(HttpResponse::Ok().json(LoginResp { token }))
}

#[cfg(test)]
mod tests {
    use super::is_valid_email;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b-c_d@mail.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("alice@.com"));
        assert!(!is_valid_email("alice smith@example.com"));
    }
}
