use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::comment::{Comment, NewComment};
use crate::schema::{comments, feedback, profiles};

pub struct CommentRepo;

impl CommentRepo {
    pub fn find_by_id(
        conn: &mut PgConnection,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, diesel::result::Error> {
        comments::table
            .filter(comments::id.eq(comment_id))
            .select(Comment::as_select())
            .first(conn)
            .optional()
    }

    /// The comment together with the workspace of the feedback it belongs to.
    pub fn find_with_workspace(
        conn: &mut PgConnection,
        comment_id: Uuid,
    ) -> Result<Option<(Comment, Uuid)>, diesel::result::Error> {
        comments::table
            .inner_join(feedback::table)
            .filter(comments::id.eq(comment_id))
            .select((Comment::as_select(), feedback::workspace_id))
            .first(conn)
            .optional()
    }

    /// Oldest first in insertion order, with author full name and email.
    pub fn list_for_feedback(
        conn: &mut PgConnection,
        target_feedback_id: Uuid,
    ) -> Result<Vec<(Comment, String, String)>, diesel::result::Error> {
        comments::table
            .inner_join(profiles::table.on(profiles::id.eq(comments::author_id)))
            .filter(comments::feedback_id.eq(target_feedback_id))
            .order((comments::created_at.asc(), comments::seq.asc()))
            .select((Comment::as_select(), profiles::full_name, profiles::email))
            .load(conn)
    }

    pub fn insert(
        conn: &mut PgConnection,
        new_comment: &NewComment,
    ) -> Result<Comment, diesel::result::Error> {
        diesel::insert_into(comments::table)
            .values(new_comment)
            .returning(Comment::as_returning())
            .get_result(conn)
    }

    pub fn update_content(
        conn: &mut PgConnection,
        comment_id: Uuid,
        new_content: &str,
    ) -> Result<Comment, diesel::result::Error> {
        diesel::update(comments::table.filter(comments::id.eq(comment_id)))
            .set((
                comments::content.eq(new_content),
                comments::updated_at.eq(Utc::now()),
            ))
            .returning(Comment::as_returning())
            .get_result(conn)
    }

    pub fn delete(
        conn: &mut PgConnection,
        comment_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(comments::table.filter(comments::id.eq(comment_id))).execute(conn)
    }

    pub fn delete_for_feedback(
        conn: &mut PgConnection,
        target_feedback_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(comments::table.filter(comments::feedback_id.eq(target_feedback_id)))
            .execute(conn)
    }

    pub fn count_for_feedback(
        conn: &mut PgConnection,
        target_feedback_id: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        comments::table
            .filter(comments::feedback_id.eq(target_feedback_id))
            .count()
            .get_result(conn)
    }

    pub fn count_for_workspace(
        conn: &mut PgConnection,
        workspace_id: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        comments::table
            .inner_join(feedback::table)
            .filter(feedback::workspace_id.eq(workspace_id))
            .count()
            .get_result(conn)
    }

    /// Latest comments in the workspace as
    /// `(feedback_id, feedback_title, author_id, created_at)`.
    pub fn recent_for_workspace(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        limit: i64,
    ) -> Result<Vec<(Uuid, String, Uuid, DateTime<Utc>)>, diesel::result::Error> {
        comments::table
            .inner_join(feedback::table)
            .filter(feedback::workspace_id.eq(workspace_id))
            .order((comments::created_at.desc(), comments::seq.desc()))
            .limit(limit)
            .select((
                comments::feedback_id,
                feedback::title,
                comments::author_id,
                comments::created_at,
            ))
            .load(conn)
    }
}
