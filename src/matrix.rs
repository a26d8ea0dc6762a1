//! C64 keyboard matrix store.
//!
//! The C64 keyboard is an 8×8 matrix wired to CIA1:
//! - Rows are the port A lines ($DC00)
//! - Columns are the port B lines ($DC01)
//!
//! A pressed key closes the contact between one row and one column. The
//! store keeps the closed contacts twice, once indexed by row and once by
//! column, so the connectivity solver can expand either side of the
//! bipartite graph with a single lookup.
//!
//! ## Keyboard Matrix Layout
//!
//! ```text
//! Row\Col |  0    1    2    3    4    5    6    7
//! --------|------------------------------------------
//!    0    | DEL  RET   →   F7   F1   F3   F5   ↓
//!    1    |  3    W    A    4    Z    S    E  LSHFT
//!    2    |  5    R    D    6    C    F    T    X
//!    3    |  7    Y    G    8    B    H    U    V
//!    4    |  9    I    J    0    M    K    O    N
//!    5    |  +    P    L    -    .    :    @    ,
//!    6    |  £    *    ;  HOME RSHFT =    ↑    /
//!    7    |  1    ←  CTRL   2  SPACE  C=   Q  STOP
//! ```
//!
//! SHIFT LOCK is a mechanical latch wired in parallel with left shift. It
//! is tracked as a separate flag rather than as a matrix bit.

/// Matrix dimension (rows and columns).
pub const MATRIX_SIZE: usize = 8;

/// Row of the contact closed by the SHIFT LOCK latch.
pub const SHIFT_LOCK_ROW: u8 = 1;

/// Column of the contact closed by the SHIFT LOCK latch.
pub const SHIFT_LOCK_COL: u8 = 7;

/// Keyboard matrix state.
///
/// Invariant: bit `j` of `by_row[i]` equals bit `i` of `by_col[j]`.
/// Every mutator updates both views together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMatrix {
    by_row: [u8; MATRIX_SIZE],
    by_col: [u8; MATRIX_SIZE],
    shift_lock: bool,
}

impl KeyMatrix {
    /// Create a new matrix with all keys released and SHIFT LOCK off.
    pub const fn new() -> Self {
        Self {
            by_row: [0; MATRIX_SIZE],
            by_col: [0; MATRIX_SIZE],
            shift_lock: false,
        }
    }

    /// Columns closed on `row` (bit N = key at column N pressed).
    #[inline]
    pub fn row_mask(&self, row: u8) -> u8 {
        self.by_row[row as usize]
    }

    /// Rows closed on `col` (bit N = key at row N pressed).
    #[inline]
    pub fn col_mask(&self, col: u8) -> u8 {
        self.by_col[col as usize]
    }

    /// Press a key at the specified matrix position.
    ///
    /// # Panics
    /// Debug builds panic if row or col is >= 8.
    pub fn key_down(&mut self, row: u8, col: u8) {
        self.set_key(row, col, true);
    }

    /// Release a key at the specified matrix position.
    ///
    /// # Panics
    /// Debug builds panic if row or col is >= 8.
    pub fn key_up(&mut self, row: u8, col: u8) {
        self.set_key(row, col, false);
    }

    /// Set the contact at `(row, col)` closed or open.
    pub fn set_key(&mut self, row: u8, col: u8, pressed: bool) {
        debug_assert!(row < 8 && col < 8, "Matrix position out of range");
        let (r, c) = (row as usize & 7, col as usize & 7);
        if pressed {
            self.by_row[r] |= 1 << c;
            self.by_col[c] |= 1 << r;
        } else {
            self.by_row[r] &= !(1 << c);
            self.by_col[c] &= !(1 << r);
        }
    }

    /// Check if a specific key is pressed.
    ///
    /// Out-of-range positions report `false`.
    pub fn is_key_pressed(&self, row: u8, col: u8) -> bool {
        if row >= 8 || col >= 8 {
            return false;
        }
        self.by_row[row as usize] & (1 << col) != 0
    }

    /// Release all keys. The SHIFT LOCK latch is left as it is.
    pub fn release_all(&mut self) {
        self.by_row = [0; MATRIX_SIZE];
        self.by_col = [0; MATRIX_SIZE];
    }

    /// Number of closed contacts.
    pub fn pressed_count(&self) -> u32 {
        self.by_row.iter().map(|m| m.count_ones()).sum()
    }

    /// SHIFT LOCK latch state.
    #[inline]
    pub fn shift_lock(&self) -> bool {
        self.shift_lock
    }

    /// Engage or release the SHIFT LOCK latch.
    pub fn set_shift_lock(&mut self, engaged: bool) {
        self.shift_lock = engaged;
    }

    /// Packed 64-bit form, row-major (bit `row * 8 + col`).
    pub fn to_bits(&self) -> u64 {
        self.by_row
            .iter()
            .enumerate()
            .fold(0u64, |acc, (row, &mask)| acc | (mask as u64) << (row * 8))
    }

    /// Rebuild both views from the packed 64-bit form.
    pub fn from_bits(bits: u64) -> Self {
        let mut matrix = Self::new();
        for row in 0..8u8 {
            for col in 0..8u8 {
                if bits & (1u64 << (row * 8 + col)) != 0 {
                    matrix.key_down(row, col);
                }
            }
        }
        matrix
    }

    /// Check the dual-view invariant.
    pub fn is_consistent(&self) -> bool {
        (0..8).all(|row| {
            (0..8).all(|col| {
                (self.by_row[row] >> col) & 1 == (self.by_col[col] >> row) & 1
            })
        })
    }
}

/// C64 keyboard matrix positions for common keys.
///
/// Each constant is a `(row, col)` tuple.
#[allow(dead_code)]
pub mod keys {
    // Row 0
    pub const DEL: (u8, u8) = (0, 0);
    pub const RETURN: (u8, u8) = (0, 1);
    pub const CRSR_RIGHT: (u8, u8) = (0, 2);
    pub const F7: (u8, u8) = (0, 3);
    pub const F1: (u8, u8) = (0, 4);
    pub const F3: (u8, u8) = (0, 5);
    pub const F5: (u8, u8) = (0, 6);
    pub const CRSR_DOWN: (u8, u8) = (0, 7);

    // Row 1
    pub const DIGIT_3: (u8, u8) = (1, 0);
    pub const W: (u8, u8) = (1, 1);
    pub const A: (u8, u8) = (1, 2);
    pub const DIGIT_4: (u8, u8) = (1, 3);
    pub const Z: (u8, u8) = (1, 4);
    pub const S: (u8, u8) = (1, 5);
    pub const E: (u8, u8) = (1, 6);
    pub const LEFT_SHIFT: (u8, u8) = (1, 7);

    // Row 2
    pub const DIGIT_5: (u8, u8) = (2, 0);
    pub const R: (u8, u8) = (2, 1);
    pub const D: (u8, u8) = (2, 2);
    pub const DIGIT_6: (u8, u8) = (2, 3);
    pub const C: (u8, u8) = (2, 4);
    pub const F: (u8, u8) = (2, 5);
    pub const T: (u8, u8) = (2, 6);
    pub const X: (u8, u8) = (2, 7);

    // Row 3
    pub const DIGIT_7: (u8, u8) = (3, 0);
    pub const Y: (u8, u8) = (3, 1);
    pub const G: (u8, u8) = (3, 2);
    pub const DIGIT_8: (u8, u8) = (3, 3);
    pub const B: (u8, u8) = (3, 4);
    pub const H: (u8, u8) = (3, 5);
    pub const U: (u8, u8) = (3, 6);
    pub const V: (u8, u8) = (3, 7);

    // Row 4
    pub const DIGIT_9: (u8, u8) = (4, 0);
    pub const I: (u8, u8) = (4, 1);
    pub const J: (u8, u8) = (4, 2);
    pub const DIGIT_0: (u8, u8) = (4, 3);
    pub const M: (u8, u8) = (4, 4);
    pub const K: (u8, u8) = (4, 5);
    pub const O: (u8, u8) = (4, 6);
    pub const N: (u8, u8) = (4, 7);

    // Row 5
    pub const PLUS: (u8, u8) = (5, 0);
    pub const P: (u8, u8) = (5, 1);
    pub const L: (u8, u8) = (5, 2);
    pub const MINUS: (u8, u8) = (5, 3);
    pub const PERIOD: (u8, u8) = (5, 4);
    pub const COLON: (u8, u8) = (5, 5);
    pub const AT: (u8, u8) = (5, 6);
    pub const COMMA: (u8, u8) = (5, 7);

    // Row 6
    pub const POUND: (u8, u8) = (6, 0);
    pub const ASTERISK: (u8, u8) = (6, 1);
    pub const SEMICOLON: (u8, u8) = (6, 2);
    pub const HOME: (u8, u8) = (6, 3);
    pub const RIGHT_SHIFT: (u8, u8) = (6, 4);
    pub const EQUALS: (u8, u8) = (6, 5);
    pub const UP_ARROW: (u8, u8) = (6, 6);
    pub const SLASH: (u8, u8) = (6, 7);

    // Row 7
    pub const DIGIT_1: (u8, u8) = (7, 0);
    pub const LEFT_ARROW: (u8, u8) = (7, 1);
    pub const CTRL: (u8, u8) = (7, 2);
    pub const DIGIT_2: (u8, u8) = (7, 3);
    pub const SPACE: (u8, u8) = (7, 4);
    pub const COMMODORE: (u8, u8) = (7, 5);
    pub const Q: (u8, u8) = (7, 6);
    pub const RUN_STOP: (u8, u8) = (7, 7);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matrix_all_released() {
        let m = KeyMatrix::new();
        for i in 0..8 {
            assert_eq!(m.row_mask(i), 0);
            assert_eq!(m.col_mask(i), 0);
        }
        assert!(!m.shift_lock());
    }

    #[test]
    fn test_key_down_updates_both_views() {
        let mut m = KeyMatrix::new();

        // 'A' is row 1, col 2
        m.key_down(keys::A.0, keys::A.1);
        assert_eq!(m.row_mask(1), 0x04);
        assert_eq!(m.col_mask(2), 0x02);
        assert!(m.is_key_pressed(1, 2));
        assert!(m.is_consistent());

        m.key_up(1, 2);
        assert_eq!(m.row_mask(1), 0);
        assert_eq!(m.col_mask(2), 0);
        assert!(m.is_consistent());
    }

    #[test]
    fn test_multiple_keys_same_row() {
        let mut m = KeyMatrix::new();
        m.key_down(1, 1); // W
        m.key_down(1, 2); // A

        assert_eq!(m.row_mask(1), 0x06);
        assert_eq!(m.col_mask(1), 0x02);
        assert_eq!(m.col_mask(2), 0x02);
        assert_eq!(m.pressed_count(), 2);
    }

    #[test]
    fn test_out_of_range_query() {
        let m = KeyMatrix::new();
        assert!(!m.is_key_pressed(8, 0));
        assert!(!m.is_key_pressed(0, 8));
    }

    #[test]
    fn test_release_all_keeps_shift_lock() {
        let mut m = KeyMatrix::new();
        m.key_down(0, 0);
        m.key_down(7, 7);
        m.set_shift_lock(true);

        m.release_all();

        assert_eq!(m.pressed_count(), 0);
        assert!(m.shift_lock());
    }

    #[test]
    fn test_shift_lock_is_not_a_matrix_bit() {
        let mut m = KeyMatrix::new();
        m.set_shift_lock(true);
        assert_eq!(m.row_mask(SHIFT_LOCK_ROW), 0);
        assert_eq!(m.col_mask(SHIFT_LOCK_COL), 0);
    }

    #[test]
    fn test_packed_bits() {
        let mut m = KeyMatrix::new();
        m.key_down(0, 0);
        m.key_down(2, 3);
        m.key_down(7, 7);

        let bits = m.to_bits();
        assert_eq!(bits, 1 | (1 << 19) | (1 << 63));

        let restored = KeyMatrix::from_bits(bits);
        assert_eq!(restored, m);
        assert!(restored.is_consistent());
    }

    #[test]
    fn test_key_constants() {
        assert_eq!(keys::A, (1, 2));
        assert_eq!(keys::RETURN, (0, 1));
        assert_eq!(keys::SPACE, (7, 4));
        assert_eq!(keys::LEFT_SHIFT, (SHIFT_LOCK_ROW, SHIFT_LOCK_COL));
        assert_eq!(keys::RIGHT_SHIFT, (6, 4));
    }
}
