use crate::api::StudentsApi;
use crate::model::{DraftScores, Student, Subject};
use eyre::{Error, bail};
use tracing::{error, info};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    Viewing,
    /// One row, known by its roll number, is being edited.
    Editing { roll_no: String, draft: DraftScores },
}

/// The editable score table. It only ever shows what the last successful
/// fetch returned.
pub struct StudentTable<A> {
    api: A,
    students: Vec<Student>,
    mode: Mode,
}

impl<A: StudentsApi> StudentTable<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            students: Vec::new(),
            mode: Mode::Viewing,
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Reload every student. On failure the previous rows stay in place.
    pub async fn refresh(&mut self) -> bool {
        match self.api.all_students().await {
            Ok(students) => {
                self.students = students;
                true
            }
            Err(e) => {
                error!(error = %e, "Error fetching students");
                false
            }
        }
    }

    /// Start editing the row of `roll_no` from its currently displayed
    /// scores. Any other draft is dropped.
    pub fn begin_edit(&mut self, roll_no: &str) -> bool {
        let Some(student) = self.students.iter().find(|s| s.roll_no == roll_no) else {
            return false;
        };
        self.mode = Mode::Editing {
            roll_no: student.roll_no.clone(),
            draft: student.scores.draft(),
        };
        true
    }

    pub fn change_score(&mut self, subject: Subject, input: &str) -> bool {
        match &mut self.mode {
            Mode::Editing { draft, .. } => {
                draft.insert(subject, parse_int(input));
                true
            }
            Mode::Viewing => false,
        }
    }

    /// Send the draft. On success the table goes back to viewing and is
    /// reloaded; on failure the draft is left untouched.
    pub async fn submit(&mut self) -> Result<String, Error> {
        let Mode::Editing { roll_no, draft } = &self.mode else {
            bail!("no row is being edited");
        };
        let message = self.api.update_scores(roll_no, draft).await.inspect_err(|e| {
            error!(roll_no = %roll_no, error = %e, "Error updating student");
        })?;
        info!(roll_no = %roll_no, "student updated");
        self.mode = Mode::Viewing;
        self.refresh().await;
        Ok(message)
    }
}

/// Read a base 10 integer prefix: leading whitespace and a sign are
/// accepted, anything after the digits is ignored.
pub fn parse_int(input: &str) -> Option<i64> {
    let input = input.trim_start();
    let (negative, rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return None;
    }
    let value = digits.parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}
