use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

#[derive(Queryable, Selectable, Identifiable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Vote {
    pub id: Uuid,
    pub feedback_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::votes)]
pub struct NewVote {
    pub feedback_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteToggle {
    pub feedback_id: Uuid,
    pub vote_count: i32,
    pub has_voted: bool,
}
