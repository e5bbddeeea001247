use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::changelog::{
    ChangelogChanges, ChangelogEntry, ChangelogLink, NewChangelogEntry, NewChangelogLink,
};
use crate::db::models::feedback::FeedbackSummary;
use crate::schema::{changelog_entries, changelog_feedback_links, feedback};

pub struct ChangelogRepo;

impl ChangelogRepo {
    fn visible<'a>(
        workspace_id: Uuid,
        include_drafts: bool,
    ) -> changelog_entries::BoxedQuery<'a, Pg> {
        let query = changelog_entries::table
            .filter(changelog_entries::workspace_id.eq(workspace_id))
            .into_boxed();
        if include_drafts {
            query
        } else {
            query.filter(changelog_entries::published.eq(true))
        }
    }

    pub fn insert(
        conn: &mut PgConnection,
        new_entry: &NewChangelogEntry,
    ) -> Result<ChangelogEntry, diesel::result::Error> {
        diesel::insert_into(changelog_entries::table)
            .values(new_entry)
            .get_result(conn)
    }

    pub fn find_in_workspace(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<ChangelogEntry>, diesel::result::Error> {
        changelog_entries::table
            .filter(changelog_entries::id.eq(entry_id))
            .filter(changelog_entries::workspace_id.eq(workspace_id))
            .first(conn)
            .optional()
    }

    pub fn update_fields(
        conn: &mut PgConnection,
        entry_id: Uuid,
        changes: &ChangelogChanges,
    ) -> Result<ChangelogEntry, diesel::result::Error> {
        diesel::update(changelog_entries::table.filter(changelog_entries::id.eq(entry_id)))
            .set(changes)
            .get_result(conn)
    }

    /// `Some(at)` publishes at that instant, `None` reverts to draft.
    pub fn set_published(
        conn: &mut PgConnection,
        entry_id: Uuid,
        at: Option<DateTime<Utc>>,
    ) -> Result<ChangelogEntry, diesel::result::Error> {
        diesel::update(changelog_entries::table.filter(changelog_entries::id.eq(entry_id)))
            .set((
                changelog_entries::published.eq(at.is_some()),
                changelog_entries::published_at.eq(at),
                changelog_entries::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }

    pub fn delete(conn: &mut PgConnection, entry_id: Uuid) -> Result<usize, diesel::result::Error> {
        diesel::delete(changelog_entries::table.filter(changelog_entries::id.eq(entry_id)))
            .execute(conn)
    }

    /// Newest published first, drafts last.
    pub fn page(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        include_drafts: bool,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ChangelogEntry>, i64), diesel::result::Error> {
        let total = Self::visible(workspace_id, include_drafts)
            .count()
            .get_result::<i64>(conn)?;

        let rows = Self::visible(workspace_id, include_drafts)
            .order((
                changelog_entries::published_at.desc().nulls_last(),
                changelog_entries::created_at.desc(),
            ))
            .offset(offset)
            .limit(limit)
            .load(conn)?;

        Ok((rows, total))
    }

    pub fn latest_published(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ChangelogEntry>, diesel::result::Error> {
        Self::visible(workspace_id, false)
            .order(changelog_entries::published_at.desc())
            .limit(limit)
            .load(conn)
    }

    pub fn insert_link(
        conn: &mut PgConnection,
        link: &NewChangelogLink,
    ) -> Result<ChangelogLink, diesel::result::Error> {
        diesel::insert_into(changelog_feedback_links::table)
            .values(link)
            .returning(ChangelogLink::as_returning())
            .get_result(conn)
    }

    pub fn insert_links_if_absent(
        conn: &mut PgConnection,
        links: &[NewChangelogLink],
    ) -> Result<usize, diesel::result::Error> {
        if links.is_empty() {
            return Ok(0);
        }
        diesel::insert_into(changelog_feedback_links::table)
            .values(links)
            .on_conflict((
                changelog_feedback_links::changelog_id,
                changelog_feedback_links::feedback_id,
            ))
            .do_nothing()
            .execute(conn)
    }

    pub fn delete_link(
        conn: &mut PgConnection,
        entry_id: Uuid,
        feedback_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(
            changelog_feedback_links::table
                .filter(changelog_feedback_links::changelog_id.eq(entry_id))
                .filter(changelog_feedback_links::feedback_id.eq(feedback_id)),
        )
        .execute(conn)
    }

    pub fn delete_links_for_entry(
        conn: &mut PgConnection,
        entry_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(
            changelog_feedback_links::table
                .filter(changelog_feedback_links::changelog_id.eq(entry_id)),
        )
        .execute(conn)
    }

    pub fn delete_links_for_feedback(
        conn: &mut PgConnection,
        feedback_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(
            changelog_feedback_links::table
                .filter(changelog_feedback_links::feedback_id.eq(feedback_id)),
        )
        .execute(conn)
    }

    /// Linked feedback summaries keyed by changelog entry id.
    pub fn linked_feedback(
        conn: &mut PgConnection,
        entry_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, FeedbackSummary)>, diesel::result::Error> {
        if entry_ids.is_empty() {
            return Ok(Vec::new());
        }
        changelog_feedback_links::table
            .inner_join(feedback::table)
            .filter(changelog_feedback_links::changelog_id.eq_any(entry_ids))
            .order(changelog_feedback_links::created_at.asc())
            .select((
                changelog_feedback_links::changelog_id,
                (
                    feedback::id,
                    feedback::title,
                    feedback::vote_count,
                    feedback::category,
                ),
            ))
            .load(conn)
    }
}
