//! Shot history - the shooter's record of cells fired at on the opponent's board
//!
//! Each cell moves from untargeted to `Hit` or `Miss` exactly once.

use crate::errors::ShotError;
use crate::types::ShotMark;

/// One recorded shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotRecord {
    pub mark: ShotMark,
    pub row: usize,
    pub col: usize,
}

/// Grid parallel to the opponent's board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotHistory {
    width: usize,
    height: usize,
    marks: Vec<Option<ShotMark>>,
    count: usize,
}

impl ShotHistory {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            marks: vec![None; width * height],
            count: 0,
        }
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row as usize >= self.height || col as usize >= self.width {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// Mark at (row, col); `None` if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Option<ShotMark>> {
        self.index(row, col).map(|idx| self.marks[idx])
    }

    /// Validate a shot target without recording it
    pub fn check(&self, row: i32, col: i32) -> Result<(), ShotError> {
        let idx = self
            .index(row, col)
            .ok_or(ShotError::OutOfBounds { row, col })?;
        if self.marks[idx].is_some() {
            return Err(ShotError::AlreadyTargeted { row, col });
        }
        Ok(())
    }

    /// Record the result of a shot
    ///
    /// Fails if the cell is off the grid or was already recorded; the history
    /// is unchanged on failure.
    pub fn record(&mut self, row: i32, col: i32, mark: ShotMark) -> Result<(), ShotError> {
        self.check(row, col)?;
        if let Some(idx) = self.index(row, col) {
            self.marks[idx] = Some(mark);
            self.count += 1;
        }
        Ok(())
    }

    /// Number of recorded shots
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Every recorded shot in row-major order
    pub fn summarize(&self) -> Vec<ShotRecord> {
        self.marks
            .iter()
            .enumerate()
            .filter_map(|(idx, mark)| {
                mark.map(|mark| ShotRecord {
                    mark,
                    row: idx / self.width,
                    col: idx % self.width,
                })
            })
            .collect()
    }
}
