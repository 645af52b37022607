use crate::error::AppError;
use crate::model::{Scores, Student};
use serde::{Deserialize, Deserializer};

pub const MAX_ROLL_NO_LEN: usize = 64;
pub const MAX_NAME_LEN: usize = 255;

/// Body accepted when creating a student.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewStudent {
    pub name: String,
    pub roll_no: String,
    #[serde(default)]
    pub scores: Scores,
}

impl NewStudent {
    pub fn validate(self) -> Result<Student, AppError> {
        check_name(&self.name)?;
        check_roll_no(&self.roll_no)?;
        Ok(Student {
            name: self.name,
            roll_no: self.roll_no,
            scores: self.scores,
        })
    }
}

/// Body accepted when updating a student. Only the fields present are
/// replaced; a present `scores` replaces every subject.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudentPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub roll_no: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub scores: Option<Scores>,
}

/// A field may be left out, but when it is there it must hold a value:
/// `null` is refused like any other wrong type.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl StudentPatch {
    pub fn apply(self, mut student: Student) -> Result<Student, AppError> {
        if let Some(name) = self.name {
            check_name(&name)?;
            student.name = name;
        }
        if let Some(roll_no) = self.roll_no {
            check_roll_no(&roll_no)?;
            student.roll_no = roll_no;
        }
        if let Some(scores) = self.scores {
            student.scores = scores;
        }
        Ok(student)
    }
}

fn check_name(name: &str) -> Result<(), AppError> {
    check_text("name", name, MAX_NAME_LEN)
}

fn check_roll_no(roll_no: &str) -> Result<(), AppError> {
    check_text("rollNo", roll_no, MAX_ROLL_NO_LEN)
}

fn check_text(field: &str, value: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Invalid(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::Invalid(format!(
            "{field} is longer than {max_len} characters"
        )));
    }
    Ok(())
}
