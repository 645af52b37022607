pub use self::student::{DraftScores, Scores, Student};
pub use self::subject::Subject;

mod student;
mod subject;
