/// Tile kinds, passage flags and directions.
///
/// A passage flag of `true` means the side is OPEN: the token may leave
/// the tile that way. `false` is a wall. This is the inverse of the usual
/// wall bitmask, and the authored topologies depend on it.
///
/// Kind semantics are centralized here and queried via methods.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileKind {
    Walkable,
    Flower,    // Blocks until bloomed by light
    Ice,       // Blocks until melted by warmth
    Bloomed,   // Resolved flower, walkable
    StartTile, // Round start, walkable
}

impl TileKind {
    /// Does tilting move the token off this tile?
    /// Ice and Flower are handled only by the objective rules.
    pub fn accepts_tilt(self) -> bool {
        match self {
            TileKind::Walkable | TileKind::Bloomed | TileKind::StartTile => true,
            TileKind::Flower | TileKind::Ice => false,
        }
    }

    /// Single-character glyph, used by layout diagrams and debug output.
    pub fn glyph(self) -> char {
        match self {
            TileKind::Walkable => '.',
            TileKind::Flower => 'F',
            TileKind::Ice => 'I',
            TileKind::Bloomed => 'B',
            TileKind::StartTile => 'S',
        }
    }
}

impl Default for TileKind {
    fn default() -> Self {
        TileKind::Walkable
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// (row delta, column delta)
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

// Passage bits, used only to author layouts compactly.
pub const N: u8 = 1;
pub const E: u8 = 2;
pub const S: u8 = 4;
pub const W: u8 = 8;

/// Four independent "can move this way" flags.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Passages {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Passages {
    pub const fn from_bits(open: u8) -> Self {
        Passages {
            north: open & N != 0,
            south: open & S != 0,
            east: open & E != 0,
            west: open & W != 0,
        }
    }

    pub fn is_open(self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Tile {
    pub passages: Passages,
    pub kind: TileKind,
}

impl Tile {
    pub const fn new(kind: TileKind, open: u8) -> Self {
        Tile { passages: Passages::from_bits(open), kind }
    }

    #[inline]
    pub fn is_open(self, dir: Direction) -> bool {
        self.passages.is_open(dir)
    }
}
