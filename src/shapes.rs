//! Block-string rendering from a shape atlas.
//!
//! An atlas holds one glyph grid per part and side. Left grids use `'1'`,
//! right grids use `'2'`, and both use `'_'` for empty cells. A task is drawn
//! by overlaying its left and right grids cell by cell.

use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::error::{Result, StimError};
use crate::types::{Part, Task};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Source of per-part glyph grids, already trimmed of padding.
pub trait ShapeAtlas {
    /// Number of parts available on each side.
    fn n_part(&self) -> usize;

    fn grid(&self, part: Part, side: Side) -> Result<&[String]>;
}

/// In-memory atlas, deserializable from `{"left": [[rows…]…], "right": […]}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GridAtlas {
    left: Vec<Vec<String>>,
    right: Vec<Vec<String>>,
}

impl GridAtlas {
    pub fn new(left: Vec<Vec<String>>, right: Vec<Vec<String>>) -> Result<Self> {
        if left.len() != right.len() {
            return Err(StimError::CompositionConflict(format!(
                "atlas has {} left parts but {} right parts",
                left.len(),
                right.len()
            )));
        }
        Ok(Self { left, right })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let raw: GridAtlas = serde_json::from_str(text)?;
        Self::new(raw.left, raw.right)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| StimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

impl ShapeAtlas for GridAtlas {
    fn n_part(&self) -> usize {
        self.left.len()
    }

    fn grid(&self, part: Part, side: Side) -> Result<&[String]> {
        let grids = match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        };
        grids
            .get(part)
            .map(Vec::as_slice)
            .ok_or(StimError::UnknownPart {
                part,
                side: side.as_str(),
            })
    }
}

/// Overlay a left grid and a right grid into one block string.
pub fn compose(left: &[String], right: &[String]) -> Result<String> {
    if left.len() != right.len() {
        return Err(StimError::CompositionConflict(format!(
            "left has {} rows, right has {}",
            left.len(),
            right.len()
        )));
    }

    let mut rows = Vec::with_capacity(left.len());
    for (r, (lrow, rrow)) in left.iter().zip(right).enumerate() {
        let lchars: Vec<char> = lrow.chars().collect();
        let rchars: Vec<char> = rrow.chars().collect();
        if lchars.len() != rchars.len() {
            return Err(StimError::CompositionConflict(format!(
                "row {r}: left has {} cells, right has {}",
                lchars.len(),
                rchars.len()
            )));
        }

        let mut row = String::with_capacity(lchars.len());
        for (c, (&l, &rc)) in lchars.iter().zip(&rchars).enumerate() {
            let cell = match (l, rc) {
                (LEFT_GLYPH, RIGHT_GLYPH) => {
                    return Err(StimError::CompositionConflict(format!(
                        "cell ({r}, {c}) claimed by both parts"
                    )))
                }
                (LEFT_GLYPH, BLANK_GLYPH) => LEFT_GLYPH,
                (BLANK_GLYPH, RIGHT_GLYPH) => RIGHT_GLYPH,
                (BLANK_GLYPH, BLANK_GLYPH) => BLANK_GLYPH,
                _ => {
                    return Err(StimError::CompositionConflict(format!(
                        "cell ({r}, {c}): unexpected glyphs {l:?} / {rc:?}"
                    )))
                }
            };
            row.push(cell);
        }
        rows.push(row);
    }
    Ok(rows.join("\n"))
}

/// Erase part structure: both part glyphs become the bespoke glyph.
pub fn make_bespoke(block: &str) -> String {
    block
        .chars()
        .map(|c| match c {
            LEFT_GLYPH | RIGHT_GLYPH => BESPOKE_GLYPH,
            other => other,
        })
        .collect()
}

/// Block string for a task.
pub fn render_task(atlas: &dyn ShapeAtlas, task: Task) -> Result<String> {
    compose(
        atlas.grid(task.left, Side::Left)?,
        atlas.grid(task.right, Side::Right)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn blank_grids_compose_to_blank() {
        let blank = rows(&["___", "___"]);
        assert_eq!(compose(&blank, &blank).unwrap(), "___\n___");
    }

    #[test]
    fn parts_overlay() {
        let l = rows(&["1__", "1__"]);
        let r = rows(&["__2", "_22"]);
        assert_eq!(compose(&l, &r).unwrap(), "1_2\n122");
    }

    #[test]
    fn overlapping_claim_is_conflict() {
        let l = rows(&["1_"]);
        let r = rows(&["2_"]);
        assert!(matches!(
            compose(&l, &r),
            Err(StimError::CompositionConflict(_))
        ));
    }

    #[test]
    fn misaligned_grids_are_rejected() {
        assert!(compose(&rows(&["1_"]), &rows(&["__", "__"])).is_err());
        assert!(compose(&rows(&["1_"]), &rows(&["___"])).is_err());
        assert!(compose(&rows(&["x_"]), &rows(&["__"])).is_err());
    }

    #[test]
    fn bespoke_rendering_erases_parts() {
        assert_eq!(make_bespoke("1_2\n122"), "3_3\n333");
    }

    #[test]
    fn atlas_from_json() {
        let atlas =
            GridAtlas::from_json(r#"{"left": [["1_"], ["__"]], "right": [["_2"], ["22"]]}"#)
                .unwrap();
        assert_eq!(atlas.n_part(), 2);
        assert_eq!(render_task(&atlas, Task::new(0, 0)).unwrap(), "12");
        assert_eq!(render_task(&atlas, Task::new(1, 1)).unwrap(), "22");
        assert!(matches!(
            render_task(&atlas, Task::new(2, 0)),
            Err(StimError::UnknownPart { part: 2, .. })
        ));
    }
}
