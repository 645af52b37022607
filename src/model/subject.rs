use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The fixed set of graded subjects.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Subject {
    Java,
    #[serde(rename = "CPP")]
    Cpp,
    Python,
    #[serde(rename = "GenAI")]
    GenAi,
    #[serde(rename = "FSD")]
    Fsd,
}

impl Subject {
    pub const ALL: [Subject; 5] = [
        Subject::Java,
        Subject::Cpp,
        Subject::Python,
        Subject::GenAi,
        Subject::Fsd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Subject::Java => "Java",
            Subject::Cpp => "CPP",
            Subject::Python => "Python",
            Subject::GenAi => "GenAI",
            Subject::Fsd => "FSD",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown subject: {s}"))
    }
}

#[test]
fn test_subject_from_str() {
    assert_eq!("genai".parse::<Subject>(), Ok(Subject::GenAi));
    assert_eq!("CPP".parse::<Subject>(), Ok(Subject::Cpp));
    assert!("C++".parse::<Subject>().is_err());
}
