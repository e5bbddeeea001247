use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::{FeedbackCategory, FeedbackStatus};
use crate::db::models::feedback::{
    Feedback, FeedbackChanges, FeedbackSort, FeedbackSummary, NewFeedback,
};
use crate::schema::feedback;

pub struct FeedbackRepo;

/// Filters shared by the public list and the admin search.
#[derive(Debug, Clone, Default)]
pub struct FeedbackFilter<'a> {
    pub status: Option<FeedbackStatus>,
    pub category: Option<FeedbackCategory>,
    pub search: Option<&'a str>,
}

impl FeedbackRepo {
    fn filtered<'a>(
        target_workspace_id: Uuid,
        filter: &FeedbackFilter<'a>,
    ) -> feedback::BoxedQuery<'a, Pg> {
        let mut query = feedback::table
            .filter(feedback::workspace_id.eq(target_workspace_id))
            .into_boxed();

        if let Some(status) = filter.status {
            query = query.filter(feedback::status.eq(status));
        }
        if let Some(category) = filter.category {
            query = query.filter(feedback::category.eq(category));
        }
        if let Some(term) = filter.search.map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term);
            query = query.filter(
                feedback::title
                    .ilike(pattern.clone())
                    .or(feedback::description.ilike(pattern)),
            );
        }

        query
    }

    pub fn insert(
        conn: &mut PgConnection,
        new_feedback: &NewFeedback,
    ) -> Result<Feedback, diesel::result::Error> {
        diesel::insert_into(feedback::table)
            .values(new_feedback)
            .get_result(conn)
    }

    pub fn find_in_workspace(
        conn: &mut PgConnection,
        target_workspace_id: Uuid,
        feedback_id: Uuid,
    ) -> Result<Option<Feedback>, diesel::result::Error> {
        feedback::table
            .filter(feedback::id.eq(feedback_id))
            .filter(feedback::workspace_id.eq(target_workspace_id))
            .first(conn)
            .optional()
    }

    /// Same as `find_in_workspace` but holds a row lock until the transaction ends.
    pub fn lock_in_workspace(
        conn: &mut PgConnection,
        target_workspace_id: Uuid,
        feedback_id: Uuid,
    ) -> Result<Option<Feedback>, diesel::result::Error> {
        feedback::table
            .filter(feedback::id.eq(feedback_id))
            .filter(feedback::workspace_id.eq(target_workspace_id))
            .for_update()
            .first(conn)
            .optional()
    }

    pub fn list(
        conn: &mut PgConnection,
        target_workspace_id: Uuid,
        filter: &FeedbackFilter,
        sort: FeedbackSort,
    ) -> Result<Vec<Feedback>, diesel::result::Error> {
        let query = Self::filtered(target_workspace_id, filter);
        let query = match sort {
            FeedbackSort::Votes => {
                query.order((feedback::vote_count.desc(), feedback::created_at.desc()))
            }
            FeedbackSort::Recent => query.order(feedback::created_at.desc()),
        };
        query.load(conn)
    }

    /// One page of the admin listing, newest first, plus the unpaged total.
    pub fn search_page(
        conn: &mut PgConnection,
        target_workspace_id: Uuid,
        filter: &FeedbackFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Feedback>, i64), diesel::result::Error> {
        let total = Self::filtered(target_workspace_id, filter)
            .count()
            .get_result::<i64>(conn)?;

        let rows = Self::filtered(target_workspace_id, filter)
            .order(feedback::created_at.desc())
            .offset(offset)
            .limit(limit)
            .load(conn)?;

        Ok((rows, total))
    }

    pub fn top_voted(
        conn: &mut PgConnection,
        target_workspace_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Feedback>, diesel::result::Error> {
        feedback::table
            .filter(feedback::workspace_id.eq(target_workspace_id))
            .order((feedback::vote_count.desc(), feedback::created_at.desc()))
            .limit(limit)
            .load(conn)
    }

    pub fn recent(
        conn: &mut PgConnection,
        target_workspace_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Feedback>, diesel::result::Error> {
        feedback::table
            .filter(feedback::workspace_id.eq(target_workspace_id))
            .order(feedback::created_at.desc())
            .limit(limit)
            .load(conn)
    }

    pub fn update_fields(
        conn: &mut PgConnection,
        feedback_id: Uuid,
        changes: &FeedbackChanges,
    ) -> Result<Feedback, diesel::result::Error> {
        diesel::update(feedback::table.filter(feedback::id.eq(feedback_id)))
            .set(changes)
            .get_result(conn)
    }

    pub fn set_status(
        conn: &mut PgConnection,
        feedback_id: Uuid,
        new_status: FeedbackStatus,
    ) -> Result<Feedback, diesel::result::Error> {
        diesel::update(feedback::table.filter(feedback::id.eq(feedback_id)))
            .set((
                feedback::status.eq(new_status),
                feedback::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }

    /// Applies `delta` to `vote_count` and returns the new value.
    pub fn adjust_vote_count(
        conn: &mut PgConnection,
        feedback_id: Uuid,
        delta: i32,
    ) -> Result<i32, diesel::result::Error> {
        diesel::update(feedback::table.filter(feedback::id.eq(feedback_id)))
            .set(feedback::vote_count.eq(feedback::vote_count + delta))
            .returning(feedback::vote_count)
            .get_result(conn)
    }

    pub fn adjust_comment_count(
        conn: &mut PgConnection,
        feedback_id: Uuid,
        delta: i32,
    ) -> Result<i32, diesel::result::Error> {
        diesel::update(feedback::table.filter(feedback::id.eq(feedback_id)))
            .set(feedback::comment_count.eq(feedback::comment_count + delta))
            .returning(feedback::comment_count)
            .get_result(conn)
    }

    pub fn delete(
        conn: &mut PgConnection,
        feedback_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(feedback::table.filter(feedback::id.eq(feedback_id))).execute(conn)
    }

    pub fn summaries(
        conn: &mut PgConnection,
        ids: &[Uuid],
    ) -> Result<Vec<FeedbackSummary>, diesel::result::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        feedback::table
            .filter(feedback::id.eq_any(ids))
            .select((
                feedback::id,
                feedback::title,
                feedback::vote_count,
                feedback::category,
            ))
            .load(conn)
    }

    /// The subset of `ids` that belong to the workspace.
    pub fn ids_in_workspace(
        conn: &mut PgConnection,
        target_workspace_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>, diesel::result::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        feedback::table
            .filter(feedback::workspace_id.eq(target_workspace_id))
            .filter(feedback::id.eq_any(ids))
            .select(feedback::id)
            .load(conn)
    }

    pub fn count_by_status(
        conn: &mut PgConnection,
        target_workspace_id: Uuid,
    ) -> Result<Vec<(FeedbackStatus, i64)>, diesel::result::Error> {
        feedback::table
            .filter(feedback::workspace_id.eq(target_workspace_id))
            .group_by(feedback::status)
            .select((feedback::status, diesel::dsl::count_star()))
            .load(conn)
    }

    pub fn count_by_category(
        conn: &mut PgConnection,
        target_workspace_id: Uuid,
    ) -> Result<Vec<(FeedbackCategory, i64)>, diesel::result::Error> {
        feedback::table
            .filter(feedback::workspace_id.eq(target_workspace_id))
            .group_by(feedback::category)
            .select((feedback::category, diesel::dsl::count_star()))
            .load(conn)
    }
}
