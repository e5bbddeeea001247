use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Maps a fieldless enum onto a text column, one literal per variant.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("Unrecognized {} value: {}", stringify!($name), other)),
                }
            }
        }

        impl ToSql<Text, Pg> for $name {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                out.write_all(self.as_str().as_bytes())?;
                Ok(IsNull::No)
            }
        }

        impl FromSql<Text, Pg> for $name {
            fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
                let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
                s.parse::<$name>().map_err(|e| e.into())
            }
        }
    };
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Voter,
}

text_enum!(UserRole {
    Admin => "admin",
    Voter => "voter",
});

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Feature,
    Improvement,
    Bug,
    Other,
}

text_enum!(FeedbackCategory {
    Feature => "feature",
    Improvement => "improvement",
    Bug => "bug",
    Other => "other",
});

/// `closed` is reachable from every other status; transitions are not
/// otherwise constrained.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Open,
    UnderReview,
    Planned,
    InProgress,
    Completed,
    Closed,
}

text_enum!(FeedbackStatus {
    Open => "open",
    UnderReview => "under_review",
    Planned => "planned",
    InProgress => "in_progress",
    Completed => "completed",
    Closed => "closed",
});

impl FeedbackStatus {
    /// Human readable label used in notification emails.
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackStatus::Open => "Open",
            FeedbackStatus::UnderReview => "Under Review",
            FeedbackStatus::Planned => "Planned",
            FeedbackStatus::InProgress => "In Progress",
            FeedbackStatus::Completed => "Completed",
            FeedbackStatus::Closed => "Closed",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum RoadmapStatus {
    Planned,
    #[serde(alias = "in-progress")]
    InProgress,
    Completed,
}

text_enum!(RoadmapStatus {
    Planned => "planned",
    InProgress => "in_progress",
    Completed => "completed",
});

impl Default for RoadmapStatus {
    fn default() -> Self {
        RoadmapStatus::Planned
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum ChangelogCategory {
    Feature,
    Improvement,
    Bugfix,
    Breaking,
}

text_enum!(ChangelogCategory {
    Feature => "feature",
    Improvement => "improvement",
    Bugfix => "bugfix",
    Breaking => "breaking",
});
