use crate::model::{Scores, Student, Subject};
use serde::{Deserialize, Serialize};

/// A student as listed with their GPA instead of their scores.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGpa {
    pub name: String,
    pub roll_no: String,
    pub gpa: String,
}

/// Mean of the subject scores. Always divided by the number of subjects,
/// zero scores included.
#[allow(clippy::cast_precision_loss)]
pub fn gpa(scores: &Scores) -> f64 {
    scores.total() as f64 / Subject::ALL.len() as f64
}

pub fn format_gpa(gpa: f64) -> String {
    format!("{gpa:.2}")
}

pub fn with_gpa(student: &Student) -> StudentGpa {
    StudentGpa {
        name: student.name.clone(),
        roll_no: student.roll_no.clone(),
        gpa: format_gpa(gpa(&student.scores)),
    }
}

#[test]
fn test_gpa() {
    let scores = Scores {
        java: 80,
        cpp: 90,
        python: 70,
        genai: 100,
        fsd: 60,
    };
    assert_eq!(format_gpa(gpa(&scores)), "80.00");
    assert_eq!(format_gpa(gpa(&Scores::default())), "0.00");
    let scores = Scores {
        java: 99,
        ..Scores::default()
    };
    assert_eq!(format_gpa(gpa(&scores)), "19.80");
}

#[test]
fn test_with_gpa() {
    let student = Student {
        name: "Amy".into(),
        roll_no: "R1".into(),
        scores: Scores {
            java: 100,
            cpp: 100,
            python: 100,
            genai: 100,
            fsd: 100,
        },
    };
    assert_eq!(
        with_gpa(&student),
        StudentGpa {
            name: "Amy".into(),
            roll_no: "R1".into(),
            gpa: "100.00".into(),
        }
    );
}
