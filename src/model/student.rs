use super::Subject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-subject scores. Subjects absent from an incoming document count as 0.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scores {
    #[serde(rename = "Java", default)]
    pub java: i64,
    #[serde(rename = "CPP", default)]
    pub cpp: i64,
    #[serde(rename = "Python", default)]
    pub python: i64,
    #[serde(rename = "GenAI", default)]
    pub genai: i64,
    #[serde(rename = "FSD", default)]
    pub fsd: i64,
}

/// Scores as edited in the table, where a cell may hold no number at all.
pub type DraftScores = BTreeMap<Subject, Option<i64>>;

impl Scores {
    pub fn get(&self, subject: Subject) -> i64 {
        match subject {
            Subject::Java => self.java,
            Subject::Cpp => self.cpp,
            Subject::Python => self.python,
            Subject::GenAi => self.genai,
            Subject::Fsd => self.fsd,
        }
    }

    pub fn set(&mut self, subject: Subject, value: i64) {
        let slot = match subject {
            Subject::Java => &mut self.java,
            Subject::Cpp => &mut self.cpp,
            Subject::Python => &mut self.python,
            Subject::GenAi => &mut self.genai,
            Subject::Fsd => &mut self.fsd,
        };
        *slot = value;
    }

    pub fn total(&self) -> i128 {
        Subject::ALL.iter().map(|&s| i128::from(self.get(s))).sum()
    }

    pub fn draft(&self) -> DraftScores {
        Subject::ALL.iter().map(|&s| (s, Some(self.get(s)))).collect()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub roll_no: String,
    pub scores: Scores,
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.roll_no)
    }
}
