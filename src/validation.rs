//! Exhaustive validation of a task code mapping.
//!
//! Collects every violated invariant instead of stopping at the first one,
//! so a broken mapping can be diagnosed from a single report.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, StimError};
use crate::types::{Code, GeneratorParams, Task, TaskCodeMapping};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    TaskCount { expected: usize, found: usize },
    TaskOutOfRange { task: Task },
    SolutionCount { task: Task, expected: usize, found: usize },
    CodeFormat { task: Task, code: Code },
    DigitOutOfRange { task: Task, code: Code },
    DuplicateCode { code: Code, first: Task, second: Task },
    BespokeMatchesHead { task: Task, code: Code, compositional: Code },
    BespokeMatchesTail { task: Task, code: Code, compositional: Code },
    InconsistentPartCode { task: Task, side: &'static str },
    TotalCodes { expected: usize, found: usize },
    Parameters { reason: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TaskCount { expected, found } => {
                write!(f, "expected {expected} tasks, got {found}")
            }
            Violation::TaskOutOfRange { task } => write!(f, "task out of range: {task}"),
            Violation::SolutionCount {
                task,
                expected,
                found,
            } => write!(f, "task {task} has {found} solutions, expected {expected}"),
            Violation::CodeFormat { task, code } => {
                write!(f, "task {task}: invalid code format {code:?}")
            }
            Violation::DigitOutOfRange { task, code } => {
                write!(f, "task {task}: code {code} has a digit out of range")
            }
            Violation::DuplicateCode {
                code,
                first,
                second,
            } => write!(f, "code {code} used by both task {first} and task {second}"),
            Violation::BespokeMatchesHead {
                task,
                code,
                compositional,
            } => write!(
                f,
                "task {task}: bespoke {code} shares its first half with compositional {compositional}"
            ),
            Violation::BespokeMatchesTail {
                task,
                code,
                compositional,
            } => write!(
                f,
                "task {task}: bespoke {code} shares its last half with compositional {compositional}"
            ),
            Violation::InconsistentPartCode { task, side } => {
                write!(f, "task {task}: {side} half disagrees with its part-code")
            }
            Violation::TotalCodes { expected, found } => {
                write!(f, "expected {expected} distinct codes, got {found}")
            }
            Violation::Parameters { reason } => write!(f, "mapping parameters: {reason}"),
        }
    }
}

/// Every violation found in one mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(StimError::ValidationFailure(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {v}")?;
        }
        Ok(())
    }
}

fn well_formed(code: &Code, params: &GeneratorParams) -> (bool, bool) {
    let format_ok = code.len() == params.code_length
        && code.as_str().bytes().all(|b| b.is_ascii_digit());
    let top = b'0'.saturating_add(params.max_digit);
    let range_ok = code.as_str().bytes().all(|b| (b'1'..=top).contains(&b));
    (format_ok, range_ok)
}

/// Check every invariant of `mapping` against its own parameters.
pub fn validate_mapping(mapping: &TaskCodeMapping) -> ValidationReport {
    let params = &mapping.params;
    let half = params.half_length();
    let mut violations = Vec::new();

    if let Err(err) = params.validate() {
        violations.push(Violation::Parameters {
            reason: err.to_string(),
        });
    }

    if mapping.len() != params.task_count() {
        violations.push(Violation::TaskCount {
            expected: params.task_count(),
            found: mapping.len(),
        });
    }

    let mut owner: HashMap<&Code, Task> = HashMap::new();
    let mut total = 0usize;

    for (&task, solutions) in mapping.iter() {
        if task.left >= params.n_part || task.right >= params.n_part {
            violations.push(Violation::TaskOutOfRange { task });
        }
        if solutions.count() != params.solutions_per_task {
            violations.push(Violation::SolutionCount {
                task,
                expected: params.solutions_per_task,
                found: solutions.count(),
            });
        }

        let comp = &solutions.compositional;
        for (code, _) in solutions.codes() {
            total += 1;
            let (format_ok, range_ok) = well_formed(code, params);
            if !format_ok {
                violations.push(Violation::CodeFormat {
                    task,
                    code: code.clone(),
                });
            } else if !range_ok {
                violations.push(Violation::DigitOutOfRange {
                    task,
                    code: code.clone(),
                });
            }
            if let Some(&first) = owner.get(code) {
                violations.push(Violation::DuplicateCode {
                    code: code.clone(),
                    first,
                    second: task,
                });
            } else {
                owner.insert(code, task);
            }
        }

        for code in &solutions.bespoke {
            if code.head(half) == comp.head(half) {
                violations.push(Violation::BespokeMatchesHead {
                    task,
                    code: code.clone(),
                    compositional: comp.clone(),
                });
            }
            if code.tail(half) == comp.tail(half) {
                violations.push(Violation::BespokeMatchesTail {
                    task,
                    code: code.clone(),
                    compositional: comp.clone(),
                });
            }
        }

        // Compositional halves must agree with the row/column reference task.
        if let Some(row_ref) = mapping.get(&Task::new(task.left, 0)) {
            if row_ref.compositional.head(half) != comp.head(half) {
                violations.push(Violation::InconsistentPartCode { task, side: "left" });
            }
        }
        if let Some(col_ref) = mapping.get(&Task::new(0, task.right)) {
            if col_ref.compositional.tail(half) != comp.tail(half) {
                violations.push(Violation::InconsistentPartCode {
                    task,
                    side: "right",
                });
            }
        }
    }

    let expected_total = params.task_count() * params.solutions_per_task;
    if owner.len() != expected_total || total != expected_total {
        violations.push(Violation::TotalCodes {
            expected: expected_total,
            found: owner.len(),
        });
    }

    ValidationReport { violations }
}
