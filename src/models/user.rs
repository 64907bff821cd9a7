use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A registered account. The password hash never leaves this struct; there is
/// no Serialize impl on purpose.
#[derive(FromRow, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
