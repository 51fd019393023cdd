//! Course and class-group entity types

use serde::{Deserialize, Serialize};

/// Academic term within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum Term {
    #[default]
    I,
    II,
    III,
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::I => write!(f, "I"),
            Term::II => write!(f, "II"),
            Term::III => write!(f, "III"),
        }
    }
}

impl std::str::FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "I" | "1" => Ok(Term::I),
            "II" | "2" => Ok(Term::II),
            "III" | "3" => Ok(Term::III),
            _ => Err(format!("Invalid term: {}. Use I, II, or III", s)),
        }
    }
}

/// A course in the university catalog, identified by its unique code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub code: String,
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// One section of a course, taught by a professor in a given term.
///
/// Enrolled students live in the `group_members` join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: i64,
    pub course_id: i64,
    pub number: u32,
    pub year: u32,
    pub term: Term,
    pub professor_id: i64,
}

impl ClassGroup {
    /// Semester display string, e.g. "Term II, 2026".
    pub fn semester(&self) -> String {
        format!("Term {}, {}", self.term, self.year)
    }
}
