use crate::model::{Student, Subject};
use crate::stats::StudentGpa;
use crate::table::Mode;

const HEADERS: [&str; 8] = [
    "Name",
    "Roll Number",
    "Java",
    "CPP",
    "Python",
    "GenAI",
    "FSD",
    "Action",
];

/// Lay out the students list. Cells of the row being edited are shown
/// between brackets, an empty bracket meaning "not a number".
pub fn render_table(students: &[Student], mode: &Mode) -> String {
    let rows = students
        .iter()
        .map(|student| {
            let mut row = vec![student.name.clone(), student.roll_no.clone()];
            match mode {
                Mode::Editing { roll_no, draft } if *roll_no == student.roll_no => {
                    row.extend(Subject::ALL.iter().map(|s| {
                        format!(
                            "[{}]",
                            draft
                                .get(s)
                                .copied()
                                .flatten()
                                .map_or_else(String::new, |v| v.to_string())
                        )
                    }));
                    row.push("Submit".to_owned());
                }
                _ => {
                    row.extend(
                        Subject::ALL
                            .iter()
                            .map(|&s| student.scores.get(s).to_string()),
                    );
                    row.push("Update".to_owned());
                }
            }
            row
        })
        .collect::<Vec<_>>();
    let mut out = String::from("Students List\n");
    out.push_str(&layout(&HEADERS, &rows));
    out
}

pub fn render_gpa(students: &[StudentGpa]) -> String {
    let rows = students
        .iter()
        .map(|s| vec![s.name.clone(), s.roll_no.clone(), s.gpa.clone()])
        .collect::<Vec<_>>();
    layout(&["Name", "Roll Number", "GPA"], &rows)
}

fn layout(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let separator = widths
        .iter()
        .map(|&w| "-".repeat(w))
        .collect::<Vec<_>>()
        .join("-+-");
    let mut lines = vec![line(&widths, headers.iter().copied()), separator];
    lines.extend(rows.iter().map(|row| line(&widths, row.iter().map(String::as_str))));
    lines.iter().map(|l| format!("{l}\n")).collect()
}

fn line<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::roster;

    #[test]
    fn viewing_rows_show_scores() {
        let out = render_table(&roster(), &Mode::Viewing);
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Students List");
        assert!(lines[1].starts_with("Name | Roll Number | Java"));
        assert!(lines[3].starts_with("Amy  | R1          | 10"));
        assert!(lines[3].ends_with("Update"));
        assert!(!out.contains("Submit"));
    }

    #[test]
    fn edited_row_shows_draft() {
        let mut draft = roster()[1].scores.draft();
        draft.insert(Subject::Cpp, None);
        draft.insert(Subject::Java, Some(70));
        let mode = Mode::Editing {
            roll_no: "R2".into(),
            draft,
        };
        let out = render_table(&roster(), &mode);
        let bob = out.lines().find(|l| l.starts_with("Bob")).unwrap();
        assert!(bob.contains("[70]"));
        assert!(bob.contains("[]"));
        assert!(bob.ends_with("Submit"));
        let amy = out.lines().find(|l| l.starts_with("Amy")).unwrap();
        assert!(amy.ends_with("Update"));
    }

    #[test]
    fn gpa_list() {
        let out = render_gpa(&[StudentGpa {
            name: "Amy".into(),
            roll_no: "R1".into(),
            gpa: "80.00".into(),
        }]);
        assert_eq!(out.lines().nth(2), Some("Amy  | R1          | 80.00"));
        assert!(out.ends_with("80.00\n"));
    }

    #[test]
    fn empty_list_keeps_headers() {
        assert_eq!(
            render_gpa(&[]),
            "Name | Roll Number | GPA\n-----+-------------+----\n"
        );
    }
}
