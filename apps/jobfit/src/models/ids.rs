//! Typed identifiers for document-store records.
//!
//! Every id is an integer primary key in the store. Wrapping each one keeps a
//! `JobId` from being passed where a `QuizId` is expected, and replaces any
//! scheme that derives handles from ids by string formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

record_id!(
    /// A stored job description.
    JobId
);
record_id!(
    /// A stored résumé.
    ResumeId
);
record_id!(
    /// A quiz generated for one job.
    QuizId
);
record_id!(QuestionId);
record_id!(AnswerId);
