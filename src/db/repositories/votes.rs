use diesel::prelude::*;
use std::collections::HashSet;
use uuid::Uuid;

use crate::db::models::vote::{NewVote, Vote};
use crate::schema::{feedback, votes};

pub struct VoteRepo;

impl VoteRepo {
    pub fn find(
        conn: &mut PgConnection,
        feedback_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Vote>, diesel::result::Error> {
        votes::table
            .filter(votes::feedback_id.eq(feedback_id))
            .filter(votes::user_id.eq(user_id))
            .first(conn)
            .optional()
    }

    /// Returns 0 when the pair already exists.
    pub fn insert_if_absent(
        conn: &mut PgConnection,
        new_vote: &NewVote,
    ) -> Result<usize, diesel::result::Error> {
        diesel::insert_into(votes::table)
            .values(new_vote)
            .on_conflict((votes::feedback_id, votes::user_id))
            .do_nothing()
            .execute(conn)
    }

    pub fn delete(
        conn: &mut PgConnection,
        feedback_id: Uuid,
        user_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(
            votes::table
                .filter(votes::feedback_id.eq(feedback_id))
                .filter(votes::user_id.eq(user_id)),
        )
        .execute(conn)
    }

    pub fn delete_for_feedback(
        conn: &mut PgConnection,
        feedback_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(votes::table.filter(votes::feedback_id.eq(feedback_id))).execute(conn)
    }

    pub fn count_for_feedback(
        conn: &mut PgConnection,
        feedback_id: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        votes::table
            .filter(votes::feedback_id.eq(feedback_id))
            .count()
            .get_result(conn)
    }

    /// Which of `feedback_ids` the user has voted on.
    pub fn voted_among(
        conn: &mut PgConnection,
        user_id: Uuid,
        feedback_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, diesel::result::Error> {
        if feedback_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let rows = votes::table
            .filter(votes::user_id.eq(user_id))
            .filter(votes::feedback_id.eq_any(feedback_ids))
            .select(votes::feedback_id)
            .load::<Uuid>(conn)?;
        Ok(rows.into_iter().collect())
    }

    pub fn count_for_workspace(
        conn: &mut PgConnection,
        workspace_id: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        votes::table
            .inner_join(feedback::table)
            .filter(feedback::workspace_id.eq(workspace_id))
            .count()
            .get_result(conn)
    }
}
