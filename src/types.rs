//! Core value types: parts, tasks, codes, manual entries and conditions.
//!
//! A task is an ordered `(left, right)` pair of part indices. Its canonical
//! string form is `"{left+1}{right+1}"`, which is also how it is serialized.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::constants::*;
use crate::error::StimError;

/// Index of one part (half) of a task, `0..n_part`.
pub type Part = usize;

// ── Task ──

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Task {
    pub left: Part,
    pub right: Part,
}

impl Task {
    pub fn new(left: Part, right: Part) -> Self {
        Self { left, right }
    }

    /// Every task of an `n_part × n_part` grid, left-major.
    pub fn all(n_part: usize) -> Vec<Task> {
        (0..n_part)
            .flat_map(|left| (0..n_part).map(move |right| Task::new(left, right)))
            .collect()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.left + 1, self.right + 1)
    }
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(|b| (b'1'..=b'9').contains(b)) {
            return Err(format!("invalid task label {s:?}"));
        }
        Ok(Task::new((bytes[0] - b'1') as Part, (bytes[1] - b'1') as Part))
    }
}

impl Serialize for Task {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Code ──

/// A string of decimal digits. Validity (length, digit range) is checked by
/// [`crate::validation`], not on construction.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    pub fn new(s: impl Into<String>) -> Self {
        Code(s.into())
    }

    /// Build a code from digit values (1..=9).
    pub fn from_digits(digits: &[u8]) -> Self {
        Code(digits.iter().map(|&d| char::from(b'0' + d)).collect())
    }

    /// Concatenate two part-codes.
    pub fn concat(left: &Code, right: &Code) -> Self {
        Code(format!("{}{}", left.0, right.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first `half` bytes (the whole code if shorter).
    pub fn head(&self, half: usize) -> &[u8] {
        let bytes = self.0.as_bytes();
        &bytes[..half.min(bytes.len())]
    }

    /// The last `half` bytes (the whole code if shorter).
    pub fn tail(&self, half: usize) -> &[u8] {
        let bytes = self.0.as_bytes();
        &bytes[bytes.len().saturating_sub(half)..]
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Kind ──

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Compositional,
    Bespoke,
}

// ── Manual entry ──

/// A revealed `(task, kind)` example.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ManualEntry {
    pub task: Task,
    pub kind: Kind,
}

impl ManualEntry {
    pub fn new(task: Task, kind: Kind) -> Self {
        Self { task, kind }
    }

    pub fn compositional(task: Task) -> Self {
        Self::new(task, Kind::Compositional)
    }

    pub fn bespoke(task: Task) -> Self {
        Self::new(task, Kind::Bespoke)
    }
}

// ── Condition ──

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub const ALL: [Availability; 2] = [Availability::Available, Availability::Unavailable];

    pub fn from_present(present: bool) -> Self {
        if present {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Unavailable => "unavailable",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Overlap {
    Exact,
    Full,
    Partial,
    None,
}

impl Overlap {
    pub const ALL: [Overlap; 4] = [Overlap::Exact, Overlap::Full, Overlap::Partial, Overlap::None];

    /// Overlap of one matrix cell from its own compositional flag and
    /// whether its row and column hold any compositional cell.
    pub fn from_cell(exact: bool, row_has: bool, col_has: bool) -> Self {
        if exact {
            return Overlap::Exact;
        }
        match (row_has, col_has) {
            (true, true) => Overlap::Full,
            (true, false) | (false, true) => Overlap::Partial,
            (false, false) => Overlap::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Overlap::Exact => "exact",
            Overlap::Full => "full",
            Overlap::Partial => "partial",
            Overlap::None => "none",
        }
    }
}

/// How inferable a task's code is from a manual set.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct Condition {
    pub availability: Availability,
    pub overlap: Overlap,
}

impl Condition {
    pub fn new(availability: Availability, overlap: Overlap) -> Self {
        Self {
            availability,
            overlap,
        }
    }

    /// All eight design cells, availability-major.
    pub fn all() -> [Condition; CONDITION_COUNT] {
        let mut out = [Condition::new(Availability::Available, Overlap::Exact); CONDITION_COUNT];
        for (i, &a) in Availability::ALL.iter().enumerate() {
            for (j, &o) in Overlap::ALL.iter().enumerate() {
                out[i * Overlap::ALL.len() + j] = Condition::new(a, o);
            }
        }
        out
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.availability.as_str(), self.overlap.as_str())
    }
}

// ── Generator parameters ──

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorParams {
    pub max_digit: u8,
    pub code_length: usize,
    pub n_part: usize,
    pub solutions_per_task: usize,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            max_digit: MAX_DIGIT,
            code_length: CODE_LENGTH,
            n_part: N_PART,
            solutions_per_task: SOLUTIONS_PER_TASK,
        }
    }
}

impl GeneratorParams {
    pub fn half_length(&self) -> usize {
        self.code_length / 2
    }

    pub fn task_count(&self) -> usize {
        self.n_part * self.n_part
    }

    /// Reject parameter sets the task/code formats cannot express.
    pub fn validate(&self) -> Result<(), StimError> {
        if self.max_digit == 0 || self.max_digit as usize > MAX_SINGLE_DIGIT {
            return Err(StimError::InvalidParameters(format!(
                "max_digit must be in 1..={MAX_SINGLE_DIGIT}, got {}",
                self.max_digit
            )));
        }
        if self.code_length < 2 || self.code_length % 2 != 0 {
            return Err(StimError::InvalidParameters(format!(
                "code_length must be even and at least 2, got {}",
                self.code_length
            )));
        }
        if self.n_part == 0 || self.n_part > MAX_SINGLE_DIGIT {
            return Err(StimError::InvalidParameters(format!(
                "n_part must be in 1..={MAX_SINGLE_DIGIT}, got {}",
                self.n_part
            )));
        }
        if self.solutions_per_task == 0 {
            return Err(StimError::InvalidParameters(
                "solutions_per_task must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ── Task → codes mapping ──

/// All codes of one task. Serializes as `{code: kind}` with the
/// compositional code first.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TaskSolutions {
    pub compositional: Code,
    pub bespoke: Vec<Code>,
}

impl TaskSolutions {
    pub fn codes(&self) -> impl Iterator<Item = (&Code, Kind)> {
        std::iter::once((&self.compositional, Kind::Compositional))
            .chain(self.bespoke.iter().map(|c| (c, Kind::Bespoke)))
    }

    /// Number of codes, compositional included.
    pub fn count(&self) -> usize {
        1 + self.bespoke.len()
    }
}

impl Serialize for TaskSolutions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.count()))?;
        for (code, kind) in self.codes() {
            map.serialize_entry(code, &kind)?;
        }
        map.end()
    }
}

/// Immutable result of code assignment for one seed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TaskCodeMapping {
    pub params: GeneratorParams,
    pub tasks: BTreeMap<Task, TaskSolutions>,
}

impl TaskCodeMapping {
    pub fn get(&self, task: &Task) -> Option<&TaskSolutions> {
        self.tasks.get(task)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Task, &TaskSolutions)> {
        self.tasks.iter()
    }

    /// Every code in the mapping, task by task.
    pub fn all_codes(&self) -> impl Iterator<Item = &Code> {
        self.tasks.values().flat_map(|s| s.codes().map(|(c, _)| c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_label_round_trips() {
        let t = Task::new(0, 3);
        assert_eq!(t.to_string(), "14");
        assert_eq!("14".parse::<Task>().unwrap(), t);
        assert!("10".parse::<Task>().is_err());
        assert!("123".parse::<Task>().is_err());
    }

    #[test]
    fn all_tasks_left_major() {
        let tasks = Task::all(3);
        assert_eq!(tasks.len(), 9);
        assert_eq!(tasks[0], Task::new(0, 0));
        assert_eq!(tasks[1], Task::new(0, 1));
        assert_eq!(tasks[8], Task::new(2, 2));
    }

    #[test]
    fn code_halves() {
        let c = Code::new("1234");
        assert_eq!(c.head(2), b"12");
        assert_eq!(c.tail(2), b"34");
        // non-ASCII codes split on bytes
        let odd = Code::new("3é4");
        assert_eq!(odd.head(2), &"3é".as_bytes()[..2]);
        assert_eq!(odd.tail(9), "3é4".as_bytes());
        assert_eq!(Code::from_digits(&[9, 1]).as_str(), "91");
    }

    #[test]
    fn conditions_are_distinct() {
        let all = Condition::all();
        let set: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(set.len(), CONDITION_COUNT);
        assert_eq!(all[0].to_string(), "available-exact");
    }

    #[test]
    fn solutions_serialize_compositional_first() {
        let s = TaskSolutions {
            compositional: Code::new("1122"),
            bespoke: vec![Code::new("3344"), Code::new("5566")],
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(
            json,
            r#"{"1122":"compositional","3344":"bespoke","5566":"bespoke"}"#
        );
    }

    #[test]
    fn params_reject_odd_length() {
        let p = GeneratorParams {
            code_length: 3,
            ..GeneratorParams::default()
        };
        assert!(matches!(p.validate(), Err(StimError::InvalidParameters(_))));
        assert!(GeneratorParams::default().validate().is_ok());
    }
}
