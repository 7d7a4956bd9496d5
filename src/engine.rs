use std::fmt;
use std::sync::OnceLock;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions in declaration order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

const LINE_TABLE_SIZE: usize = 0x1_0000; // 65,536 possible 16-bit lines

/// Largest exponent a nibble can hold (2^15 = 32768).
pub const MAX_EXPONENT: u8 = 15;

/// Largest tile value a board can hold.
pub const MAX_TILE: u32 = 1 << MAX_EXPONENT;

type BoardRaw = u64;
type Exponent = u8;

/// Packed 4x4 2048 board as 16 4-bit exponent nibbles in a `u64`.
///
/// Cell `(row, col)` lives at index `row * 4 + col`, index 0 in the most
/// significant nibble. A nibble `k > 0` holds the tile `2^k`; `0` is empty.
/// Because only exponents are stored, a cell can never hold a value that is
/// not a power of two.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(BoardRaw);

/// The board after applying a direction, plus whether anything slid or merged.
///
/// `changed == false` means the move is a no-op (illegal) for the input board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveResult {
    pub board: Board,
    pub changed: bool,
}

/// Rejected input when building a board from plain tile values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("cell ({row}, {col}) holds {value}, expected 0 or a power of two in 2..={max}", max = MAX_TILE)]
    InvalidTile { row: usize, col: usize, value: u32 },
    #[error("cell ({row}, {col}) is outside the 4x4 board")]
    OutOfBounds { row: usize, col: usize },
}

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    /// Construct a `Board` from its raw packed representation.
    #[inline]
    pub fn from_raw(raw: BoardRaw) -> Self {
        Board(raw)
    }

    /// Borrow the raw packed `u64` for this `Board`.
    #[inline]
    pub fn raw(&self) -> BoardRaw {
        self.0
    }

    /// Build a board from a row-major matrix of tile values (0 for empty).
    ///
    /// ```
    /// use auto_2048::engine::Board;
    /// let b = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]).unwrap();
    /// assert_eq!(b.cell(3, 3), 4);
    /// assert!(Board::from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    /// ```
    pub fn from_rows(rows: [[u32; 4]; 4]) -> Result<Self, BoardError> {
        let mut raw = 0;
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                let exponent = exponent_of(value).ok_or(BoardError::InvalidTile { row, col, value })?;
                raw = with_exponent(raw, row * 4 + col, exponent);
            }
        }
        Ok(Board(raw))
    }

    /// The row-major matrix of tile values (0 for empty).
    pub fn to_rows(self) -> [[u32; 4]; 4] {
        std::array::from_fn(|row| std::array::from_fn(|col| self.cell(row, col)))
    }

    /// Return a copy with `value` placed at `(row, col)`, replacing whatever was there.
    pub fn with_tile(self, row: usize, col: usize, value: u32) -> Result<Self, BoardError> {
        if row >= 4 || col >= 4 {
            return Err(BoardError::OutOfBounds { row, col });
        }
        let exponent = exponent_of(value).ok_or(BoardError::InvalidTile { row, col, value })?;
        Ok(Board(with_exponent(self.0, row * 4 + col, exponent)))
    }

    /// Tile value at `(row, col)`, 0 if empty.
    ///
    /// Panics if `row` or `col` is not in `0..4`.
    #[inline]
    pub fn cell(self, row: usize, col: usize) -> u32 {
        assert!(row < 4 && col < 4, "cell ({row}, {col}) is outside the 4x4 board");
        tile_value(exponent_at(self.0, row * 4 + col))
    }

    #[inline]
    pub fn is_cell_empty(self, row: usize, col: usize) -> bool {
        self.cell(row, col) == 0
    }

    /// Iterate over the `(row, col)` coordinates of empty cells in row-major order.
    pub fn empty_cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..16)
            .filter(move |&idx| exponent_at(self.0, idx) == 0)
            .map(|idx| (idx / 4, idx % 4))
    }

    /// Number of cells holding a tile.
    #[inline]
    pub fn count_occupied(self) -> u32 {
        count_non_empty(self.0)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> u32 {
        16 - count_non_empty(self.0)
    }

    /// Return the highest tile value on the board (0 for an empty board).
    pub fn highest_tile(self) -> u32 {
        let max = (0..16).map(|idx| exponent_at(self.0, idx)).max().unwrap_or(0);
        tile_value(max)
    }

    /// Sum of all tile values. Moves never change it; spawns add the new tile.
    pub fn tile_sum(self) -> u64 {
        (0..16).map(|idx| u64::from(tile_value(exponent_at(self.0, idx)))).sum()
    }

    /// Score implied by the tiles on the board.
    ///
    /// A tile `2^k` counts `(k - 1) * 2^k`, the points earned merging it up
    /// from 2s. The difference across a move is exactly the merged value.
    ///
    /// ```
    /// use auto_2048::engine::Board;
    /// let b = Board::from_rows([[4, 8, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// assert_eq!(b.score(), 4 + 16);
    /// ```
    pub fn score(self) -> u64 {
        (0..16)
            .map(|idx| exponent_at(self.0, idx))
            .filter(|&k| k >= 2)
            .map(|k| u64::from(k - 1) << k)
            .sum()
    }

    /// Slide/merge tiles in `dir` and report whether anything changed.
    ///
    /// ```
    /// use auto_2048::engine::{Board, Move};
    /// let b = Board::from_rows([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let res = b.apply(Move::Left);
    /// assert!(res.changed);
    /// assert_eq!(res.board.to_rows()[0], [4, 4, 0, 0]);
    /// ```
    #[inline]
    pub fn apply(self, dir: Move) -> MoveResult {
        apply(self, dir)
    }

    /// Return the board resulting from sliding/merging tiles in `dir`.
    #[inline]
    pub fn shift(self, dir: Move) -> Self {
        apply(self, dir).board
    }

    /// Return true if no move in any direction changes the board.
    ///
    /// ```
    /// use auto_2048::engine::Board;
    /// // Nothing can slide on an empty board.
    /// assert!(Board::EMPTY.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(self) -> bool {
        is_game_over(self)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            if row > 0 {
                writeln!(f, "{}", "-".repeat(31))?;
            }
            let cells: Vec<String> = (0..4).map(|col| format_val(self.cell(row, col))).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl From<BoardRaw> for Board {
    fn from(v: BoardRaw) -> Self {
        Board::from_raw(v)
    }
}

impl From<Board> for BoardRaw {
    fn from(b: Board) -> Self {
        b.raw()
    }
}

/// Build the line lookup table now instead of on the first move. Safe to call multiple times.
pub fn warm() {
    let _ = line_table();
}

/// Slide/merge every line of `board` toward the edge `dir` points at.
///
/// Works on a copy: the input board is never modified, so callers can
/// simulate moves freely and keep or discard the result.
pub fn apply(board: Board, dir: Move) -> MoveResult {
    let table = line_table();
    let mut raw = board.0;
    for line in 0..4 {
        let cells = line_cells(dir, line);
        let packed = cells
            .iter()
            .fold(0u16, |acc, &idx| (acc << 4) | u16::from(exponent_at(board.0, idx)));
        let merged = table[usize::from(packed)];
        if merged == packed {
            continue;
        }
        for (pos, &idx) in cells.iter().enumerate() {
            let exponent = ((merged >> (12 - 4 * pos)) & 0xf) as Exponent;
            raw = with_exponent(raw, idx, exponent);
        }
    }
    let next = Board(raw);
    MoveResult { board: next, changed: next != board }
}

/// True if no move in any direction changes the board.
pub fn is_game_over(board: Board) -> bool {
    Move::ALL.iter().all(|&dir| !apply(board, dir).changed)
}

/// Cell indices of line `line` (column for vertical moves, row for
/// horizontal ones), ordered from the edge `dir` points at to the opposite edge.
pub(crate) fn line_cells(dir: Move, line: usize) -> [usize; 4] {
    debug_assert!(line < 4);
    let (start, step): (isize, isize) = match dir {
        Move::Up => (line as isize, 4),
        Move::Down => (12 + line as isize, -4),
        Move::Left => (4 * line as isize, 1),
        Move::Right => (4 * line as isize + 3, -1),
    };
    std::array::from_fn(|pos| (start + step * pos as isize) as usize)
}

/// Merge then compact one line of exponents, `line[0]` being the far edge.
///
/// Each tile, taken from the far edge inward, absorbs the first tile behind it
/// when the two are equal; the scan stops at that first tile either way, so no
/// tile merges twice in one move. Survivors then slide to the far edge in order.
pub(crate) fn merge_line(mut line: [Exponent; 4]) -> [Exponent; 4] {
    for i in 0..4 {
        let current = line[i];
        if current == 0 {
            continue;
        }
        if let Some(next) = (i + 1..4).find(|&j| line[j] != 0) {
            // Two 32768 tiles have nowhere to go in a nibble.
            if line[next] == current && current < MAX_EXPONENT {
                line[i] = current + 1;
                line[next] = 0;
            }
        }
    }
    let mut compacted = [0; 4];
    for (slot, exponent) in compacted.iter_mut().zip(line.into_iter().filter(|&e| e != 0)) {
        *slot = exponent;
    }
    compacted
}

static LINE_TABLE: OnceLock<Box<[u16]>> = OnceLock::new();

fn line_table() -> &'static [u16] {
    LINE_TABLE
        .get_or_init(|| {
            // Allocate on the heap to avoid large stack frames
            (0..LINE_TABLE_SIZE)
                .map(|packed| pack_line(merge_line(unpack_line(packed as u16))))
                .collect::<Vec<_>>()
                .into_boxed_slice()
        })
        .as_ref()
}

fn unpack_line(packed: u16) -> [Exponent; 4] {
    std::array::from_fn(|pos| ((packed >> (12 - 4 * pos)) & 0xf) as Exponent)
}

fn pack_line(line: [Exponent; 4]) -> u16 {
    line.iter().fold(0, |acc, &e| (acc << 4) | u16::from(e))
}

#[inline]
fn exponent_at(raw: BoardRaw, idx: usize) -> Exponent {
    ((raw >> (60 - 4 * idx)) & 0xf) as Exponent
}

#[inline]
fn with_exponent(raw: BoardRaw, idx: usize, exponent: Exponent) -> BoardRaw {
    let shift = 60 - 4 * idx;
    (raw & !(0xf << shift)) | (BoardRaw::from(exponent) << shift)
}

#[inline]
fn tile_value(exponent: Exponent) -> u32 {
    if exponent == 0 { 0 } else { 1 << exponent }
}

fn exponent_of(value: u32) -> Option<Exponent> {
    match value {
        0 => Some(0),
        v if v.is_power_of_two() && (2..=MAX_TILE).contains(&v) => Some(v.trailing_zeros() as Exponent),
        _ => None,
    }
}

// https://stackoverflow.com/questions/38225571/count-number-of-zero-nibbles-in-an-unsigned-64-bit-integer
fn count_non_empty(raw: BoardRaw) -> u32 {
    let mut board_copy = raw;
    board_copy |= board_copy >> 1;
    board_copy |= board_copy >> 2;
    board_copy &= 0x1111111111111111;
    board_copy.count_ones()
}

fn format_val(val: u32) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{:^7}", x),
    }
}
