use crate::api::StudentsApi;
use crate::display::{render_gpa, render_table};
use crate::model::Subject;
use crate::table::StudentTable;
use eyre::Error;
use tokio::io::{AsyncBufReadExt, BufReader, stdin};
use tracing::error;

const HELP: &str = "Commands:
  update <rollNo>          edit the scores of a student
  set <subject> <value>    change a score of the edited student
  submit                   send the edited scores
  refresh                  reload the students list
  gpa                      show every student's GPA
  help                     show this help
  quit                     leave";

#[derive(Debug, Eq, PartialEq)]
pub enum Command {
    Update(String),
    Set(Subject, String),
    Submit,
    Refresh,
    Gpa,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match word.to_ascii_lowercase().as_str() {
        "update" if !rest.is_empty() => Ok(Command::Update(rest.to_owned())),
        "update" => Err("usage: update <rollNo>".to_owned()),
        "set" => {
            let (subject, value) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            if subject.is_empty() {
                return Err("usage: set <subject> <value>".to_owned());
            }
            Ok(Command::Set(subject.parse()?, value.trim().to_owned()))
        }
        "submit" => Ok(Command::Submit),
        "refresh" => Ok(Command::Refresh),
        "gpa" => Ok(Command::Gpa),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command: {other}")),
    }
}

/// Run the interactive table until `quit` or end of input.
pub async fn run<A: StudentsApi>(mut table: StudentTable<A>) -> Result<(), Error> {
    table.refresh().await;
    println!("{}", render_table(table.students(), table.mode()));
    println!("Type \"help\" for the list of commands.");

    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match command {
            Command::Update(roll_no) => {
                if !table.begin_edit(&roll_no) {
                    println!("No student with roll number {roll_no}");
                    continue;
                }
            }
            Command::Set(subject, value) => {
                if !table.change_score(subject, &value) {
                    println!("Use \"update <rollNo>\" first");
                    continue;
                }
            }
            Command::Submit => match table.submit().await {
                Ok(message) => alert(&message),
                Err(_) => alert("Failed to update student."),
            },
            Command::Refresh => {
                table.refresh().await;
            }
            Command::Gpa => {
                match table.api().students_gpa().await {
                    Ok(students) => println!("{}", render_gpa(&students)),
                    Err(e) => error!(error = %e, "Error fetching GPA"),
                }
                continue;
            }
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        }
        println!("{}", render_table(table.students(), table.mode()));
    }
    Ok(())
}

fn alert(message: &str) {
    println!("\n*** {message} ***\n");
}

#[test]
fn test_parse_command() {
    assert_eq!(parse_command("update R1"), Ok(Command::Update("R1".into())));
    assert_eq!(
        parse_command("  UPDATE  roll 7 "),
        Ok(Command::Update("roll 7".into()))
    );
    assert!(parse_command("update").is_err());
    assert_eq!(
        parse_command("set genai 88"),
        Ok(Command::Set(Subject::GenAi, "88".into()))
    );
    assert_eq!(
        parse_command("set Java"),
        Ok(Command::Set(Subject::Java, String::new()))
    );
    assert!(parse_command("set Rust 1").is_err());
    assert!(parse_command("set").is_err());
    assert_eq!(parse_command("submit"), Ok(Command::Submit));
    assert_eq!(parse_command("quit"), Ok(Command::Quit));
    assert!(parse_command("dance").is_err());
}
