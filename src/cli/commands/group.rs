//! `stockroom group` command - class groups and enrollment

use clap::{Args, Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use crate::cli::helpers::open_store;
use crate::entities::Term;

/// CLI-friendly term enum
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliTerm {
    I,
    II,
    III,
}

impl From<CliTerm> for Term {
    fn from(cli: CliTerm) -> Self {
        match cli {
            CliTerm::I => Term::I,
            CliTerm::II => Term::II,
            CliTerm::III => Term::III,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Create a class group for a course
    New(NewArgs),

    /// List class groups, newest semester first
    List(ListArgs),

    /// Enroll a student into a group
    Enroll(EnrollArgs),

    /// List a group's enrolled students
    Students(StudentsArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Course code, e.g. "EE101"
    pub course: String,

    /// Professor email
    #[arg(long)]
    pub professor: String,

    /// Section number within the course
    #[arg(long, default_value_t = 1)]
    pub number: u32,

    #[arg(long)]
    pub year: u32,

    #[arg(long, value_enum, default_value_t = CliTerm::I)]
    pub term: CliTerm,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Restrict to one course code
    #[arg(long)]
    pub course: Option<String>,
}

#[derive(Args, Debug)]
pub struct EnrollArgs {
    /// Group id
    pub group: i64,

    /// Student email
    pub student: String,
}

#[derive(Args, Debug)]
pub struct StudentsArgs {
    /// Group id
    pub group: i64,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Course")]
    course: String,
    #[tabled(rename = "Section")]
    number: u32,
    #[tabled(rename = "Semester")]
    semester: String,
    #[tabled(rename = "Professor")]
    professor: String,
}

pub fn run(cmd: GroupCommands) -> Result<()> {
    let (_project, mut store) = open_store()?;
    match cmd {
        GroupCommands::New(args) => {
            let course = store
                .course_by_code(&args.course)
                .into_diagnostic()?
                .ok_or_else(|| miette::miette!("No course with code '{}'", args.course))?;
            let professor = store.user_by_email(&args.professor).into_diagnostic()?;
            let group = store
                .add_group(
                    course.id,
                    args.number,
                    args.year,
                    args.term.into(),
                    professor.id,
                )
                .into_diagnostic()?;
            println!(
                "{} Created group {} for {} ({})",
                style("✓").green().bold(),
                group.id,
                course,
                group.semester()
            );
        }
        GroupCommands::List(args) => {
            let course = match &args.course {
                Some(code) => Some(
                    store
                        .course_by_code(code)
                        .into_diagnostic()?
                        .ok_or_else(|| miette::miette!("No course with code '{}'", code))?,
                ),
                None => None,
            };
            let groups = store
                .list_groups(course.as_ref().map(|c| c.id))
                .into_diagnostic()?;
            if groups.is_empty() {
                println!("No groups");
                return Ok(());
            }
            let courses = store.list_courses().into_diagnostic()?;
            let users = store.list_users(None).into_diagnostic()?;
            let rows: Vec<GroupRow> = groups
                .into_iter()
                .map(|group| GroupRow {
                    id: group.id,
                    course: courses
                        .iter()
                        .find(|c| c.id == group.course_id)
                        .map(|c| c.code.clone())
                        .unwrap_or_default(),
                    number: group.number,
                    semester: group.semester(),
                    professor: users
                        .iter()
                        .find(|u| u.id == group.professor_id)
                        .map(|u| u.name.clone())
                        .unwrap_or_default(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::psql()));
        }
        GroupCommands::Enroll(args) => {
            let student = store.user_by_email(&args.student).into_diagnostic()?;
            store.enroll(args.group, student.id).into_diagnostic()?;
            println!(
                "{} Enrolled {} in group {}",
                style("✓").green().bold(),
                student.name,
                args.group
            );
        }
        GroupCommands::Students(args) => {
            let students = store.group_students(args.group).into_diagnostic()?;
            if students.is_empty() {
                println!("No students enrolled");
                return Ok(());
            }
            for student in students {
                println!("{} <{}>", student.name, student.email);
            }
        }
    }
    Ok(())
}
