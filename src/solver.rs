//! Row/column connectivity through closed key contacts.
//!
//! Pressing several keys at once can bridge matrix lines that share no key
//! directly: with keys at (0,0), (0,1) and (1,1) held, column 0 reaches
//! row 1 through row 0 and column 1. This is the source of keyboard
//! ghosting. The solver computes the full set of rows and columns that are
//! electrically joined to a starting line.
//!
//! The graph is bipartite (rows on one side, columns on the other) and
//! generally cyclic. The flood fill marks a line before expanding it, so
//! each of the 16 lines is pushed at most once and the explicit stack never
//! holds more than 16 entries.

use crate::matrix::{KeyMatrix, SHIFT_LOCK_COL, SHIFT_LOCK_ROW};

/// A single matrix line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// Row line (port A bit).
    Row(u8),
    /// Column line (port B bit).
    Col(u8),
}

/// Rows and columns joined to a starting line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reach {
    /// Visited rows (bit N = row N).
    pub rows: u8,
    /// Visited columns (bit N = column N).
    pub cols: u8,
}

/// Connectivity view over a key matrix.
///
/// The SHIFT LOCK latch, when engaged, is treated as a closed contact at
/// row 1 / column 7.
#[derive(Debug, Clone, Copy)]
pub struct Connectivity<'a> {
    matrix: &'a KeyMatrix,
}

impl<'a> Connectivity<'a> {
    /// Create a solver over `matrix`.
    pub fn new(matrix: &'a KeyMatrix) -> Self {
        Self { matrix }
    }

    /// Columns directly closed on `row`, including the SHIFT LOCK contact.
    #[inline]
    pub fn row_contacts(&self, row: u8) -> u8 {
        let mut mask = self.matrix.row_mask(row);
        if row == SHIFT_LOCK_ROW && self.matrix.shift_lock() {
            mask |= 1 << SHIFT_LOCK_COL;
        }
        mask
    }

    /// Rows directly closed on `col`, including the SHIFT LOCK contact.
    #[inline]
    pub fn col_contacts(&self, col: u8) -> u8 {
        let mut mask = self.matrix.col_mask(col);
        if col == SHIFT_LOCK_COL && self.matrix.shift_lock() {
            mask |= 1 << SHIFT_LOCK_ROW;
        }
        mask
    }

    /// Flood fill from `start`.
    pub fn reach(&self, start: Line) -> Reach {
        let mut reach = Reach::default();
        let mut stack = [Line::Row(0); 16];
        let mut len = 0;

        match start {
            Line::Row(r) => reach.rows |= 1 << r,
            Line::Col(c) => reach.cols |= 1 << c,
        }
        stack[len] = start;
        len += 1;

        while len > 0 {
            len -= 1;
            match stack[len] {
                Line::Row(r) => {
                    let fresh = self.row_contacts(r) & !reach.cols;
                    reach.cols |= fresh;
                    for c in 0..8 {
                        if fresh & (1 << c) != 0 {
                            stack[len] = Line::Col(c);
                            len += 1;
                        }
                    }
                }
                Line::Col(c) => {
                    let fresh = self.col_contacts(c) & !reach.rows;
                    reach.rows |= fresh;
                    for r in 0..8 {
                        if fresh & (1 << r) != 0 {
                            stack[len] = Line::Row(r);
                            len += 1;
                        }
                    }
                }
            }
        }

        reach
    }

    /// Everything joined to row `row`.
    #[inline]
    pub fn reach_from_row(&self, row: u8) -> Reach {
        self.reach(Line::Row(row))
    }

    /// Everything joined to column `col`.
    #[inline]
    pub fn reach_from_column(&self, col: u8) -> Reach {
        self.reach(Line::Col(col))
    }

    /// Rows pulled along with column `col`. Zero if the column has no
    /// closed contact.
    pub fn rows_from_column(&self, col: u8) -> u8 {
        self.reach_from_column(col).rows
    }

    /// Columns joined to column `col`, always including `col` itself.
    pub fn cols_from_column(&self, col: u8) -> u8 {
        self.reach_from_column(col).cols
    }

    /// Rows joined to row `row`, always including `row` itself.
    pub fn rows_from_row(&self, row: u8) -> u8 {
        self.reach_from_row(row).rows
    }

    /// Columns pulled along with row `row`. Zero if the row has no closed
    /// contact.
    pub fn cols_from_row(&self, row: u8) -> u8 {
        self.reach_from_row(row).cols
    }
}
