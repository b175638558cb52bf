use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `resumes` table. At most one per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ResumeRecord {
    pub user_id: String,
    pub experience_text: String,
    pub file_name: String,
}
