//! Eight-way compass direction enum shared across all dispersal-related crates.
//!
//! Grid rows run north → south and columns run west → east, so `North` means
//! "row − 1" and `East` means "column + 1".  Destination cells are computed by
//! the dispersal rule collaborator; this enum only labels the exit and entry
//! sides of a move.

/// The compass direction through which a cohort leaves (or enters) a cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl Direction {
    /// Number of compass directions.
    pub const COUNT: usize = 8;

    /// All directions, clockwise from north.  Index order matches
    /// [`index`][Self::index].
    pub const ALL: [Direction; Direction::COUNT] = [
        Direction::North,
        Direction::Northeast,
        Direction::East,
        Direction::Southeast,
        Direction::South,
        Direction::Southwest,
        Direction::West,
        Direction::Northwest,
    ];

    /// Position in [`ALL`][Self::ALL] — usable as a counter-array index.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction a cohort *enters* its destination through, given the
    /// direction it *exited* its source through.
    #[inline]
    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 4) % Direction::COUNT]
    }

    /// `(row delta, column delta)` of a single step in this direction.
    #[inline]
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::North     => (-1, 0),
            Direction::Northeast => (-1, 1),
            Direction::East      => (0, 1),
            Direction::Southeast => (1, 1),
            Direction::South     => (1, 0),
            Direction::Southwest => (1, -1),
            Direction::West      => (0, -1),
            Direction::Northwest => (-1, -1),
        }
    }

    /// Human-readable label, useful for CSV column values and logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North     => "N",
            Direction::Northeast => "NE",
            Direction::East      => "E",
            Direction::Southeast => "SE",
            Direction::South     => "S",
            Direction::Southwest => "SW",
            Direction::West      => "W",
            Direction::Northwest => "NW",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
