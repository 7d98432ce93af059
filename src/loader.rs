//! The binary maze file loader (§6): a tiny, read-only, little-endian
//! format with a fixed 12-byte header followed by a packed stream of wall
//! bits. This is an external collaborator the core solver doesn't touch —
//! it produces a fully-populated [`CellGrid`] and nothing more — but
//! rejecting a malformed file cleanly, rather than reading past the end of
//! the buffer, is a hard requirement (§9, open questions).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::cell::CellGrid;
use crate::maze::Maze;
use crate::position::Position;

const HEADER_LEN: usize = 12;
const CELLS_PER_WORD: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read maze file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("maze file {path} is {len} bytes, shorter than the {HEADER_LEN}-byte header")]
    TruncatedHeader { path: String, len: usize },
    #[error("maze dimensions {width}x{height} are not positive")]
    NonPositiveDimensions { width: i32, height: i32 },
    #[error("maze dimensions {width}x{height} overflow a usize cell count")]
    DimensionOverflow { width: i32, height: i32 },
    #[error(
        "maze file {path} declares {width}x{height} cells needing {expected} body bytes, but only {actual} remain"
    )]
    TruncatedBody {
        path: String,
        width: i32,
        height: i32,
        expected: usize,
        actual: usize,
    },
}

/// Loads a maze from `path`, per the format documented at the module level.
pub fn load_maze(path: impl AsRef<Path>) -> Result<Maze, LoadError> {
    let path_ref = path.as_ref();
    let path_str = path_ref.display().to_string();

    let mut file = BufReader::new(File::open(path_ref).map_err(|source| LoadError::Io {
        path: path_str.clone(),
        source,
    })?);
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|source| LoadError::Io {
            path: path_str.clone(),
            source,
        })?;

    load_maze_bytes(&bytes, &path_str)
}

/// Parses an in-memory buffer using the same rules as [`load_maze`].
/// Exposed separately so tests can build fixtures without touching disk.
pub fn load_maze_bytes(bytes: &[u8], path_for_errors: &str) -> Result<Maze, LoadError> {
    if bytes.len() < HEADER_LEN {
        return Err(LoadError::TruncatedHeader {
            path: path_for_errors.to_string(),
            len: bytes.len(),
        });
    }

    let mut header = &bytes[..HEADER_LEN];
    let width = header.read_i32::<LittleEndian>().unwrap();
    let height = header.read_i32::<LittleEndian>().unwrap();
    let solvable = header.read_i32::<LittleEndian>().unwrap();

    if width <= 0 || height <= 0 {
        return Err(LoadError::NonPositiveDimensions { width, height });
    }

    let width_usize = width as usize;
    let height_usize = height as usize;
    let total_cells = width_usize
        .checked_mul(height_usize)
        .ok_or(LoadError::DimensionOverflow { width, height })?;

    let words_per_row = (width_usize + CELLS_PER_WORD - 1) / CELLS_PER_WORD;
    let total_words = words_per_row
        .checked_mul(height_usize)
        .ok_or(LoadError::DimensionOverflow { width, height })?;
    let expected_body_len = total_words
        .checked_mul(4)
        .ok_or(LoadError::DimensionOverflow { width, height })?;

    let body = &bytes[HEADER_LEN..];
    if body.len() < expected_body_len {
        return Err(LoadError::TruncatedBody {
            path: path_for_errors.to_string(),
            width,
            height,
            expected: expected_body_len,
            actual: body.len(),
        });
    }

    log::info!(
        "loading {}x{} maze ({} cells, solvable={}) from {}",
        width,
        height,
        total_cells,
        solvable != 0,
        path_for_errors
    );

    let grid = CellGrid::new(height_usize, width_usize);
    let mut cursor = body;

    for row in 0..height_usize {
        let mut col = 0usize;
        for _word in 0..words_per_row {
            // Header bytes were already validated to be present; this read
            // cannot fail given the length check above.
            let mut bits = cursor.read_u32::<LittleEndian>().expect("body length validated above");
            for _ in 0..CELLS_PER_WORD {
                if col >= width_usize {
                    break;
                }
                let pos = Position::new(row as i64, col as i64);
                if bits & 0b01 != 0 {
                    grid.set_east_wall(pos);
                }
                if bits & 0b10 != 0 {
                    grid.set_south_wall(pos);
                }
                bits >>= 2;
                col += 1;
            }
        }
    }

    Ok(Maze::from_grid(grid))
}

/// Reverses [`load_maze_bytes`]: serializes a [`CellGrid`] to the on-disk
/// format. Used by tests and the CLI's maze-generation helper to produce
/// fixture files without depending on a pre-existing data set.
pub fn write_maze_bytes(grid: &CellGrid, solvable: bool) -> Vec<u8> {
    use byteorder::WriteBytesExt;

    let width = grid.width;
    let height = grid.height;
    let words_per_row = (width + CELLS_PER_WORD - 1) / CELLS_PER_WORD;

    let mut out = Vec::with_capacity(HEADER_LEN + words_per_row * height * 4);
    out.write_i32::<LittleEndian>(width as i32).unwrap();
    out.write_i32::<LittleEndian>(height as i32).unwrap();
    out.write_i32::<LittleEndian>(solvable as i32).unwrap();

    for row in 0..height {
        let mut col = 0usize;
        for _word in 0..words_per_row {
            let mut word = 0u32;
            for bit in 0..CELLS_PER_WORD {
                if col >= width {
                    break;
                }
                let pos = Position::new(row as i64, col as i64);
                let cell = grid.get_cell(pos);
                let mut pair = 0u32;
                if cell & crate::cell::WallBits::EAST.bits() != 0 {
                    pair |= 0b01;
                }
                if cell & crate::cell::WallBits::SOUTH.bits() != 0 {
                    pair |= 0b10;
                }
                word |= pair << (bit * 2);
                col += 1;
            }
            out.write_u32::<LittleEndian>(word).unwrap();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::recursive_backtracker;

    #[test]
    fn rejects_files_shorter_than_header() {
        let err = load_maze_bytes(&[1, 2, 3], "short.maze").unwrap_err();
        assert!(matches!(err, LoadError::TruncatedHeader { .. }));
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&0i32.to_le_bytes());
        bytes[4..8].copy_from_slice(&5i32.to_le_bytes());
        let err = load_maze_bytes(&bytes, "bad.maze").unwrap_err();
        assert!(matches!(err, LoadError::NonPositiveDimensions { .. }));
    }

    #[test]
    fn rejects_truncated_body() {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&20i32.to_le_bytes());
        bytes[4..8].copy_from_slice(&20i32.to_le_bytes());
        bytes[8..12].copy_from_slice(&1i32.to_le_bytes());
        // 20x20 needs 2 words/row * 20 rows * 4 bytes = 160 body bytes;
        // give it far less.
        bytes.extend_from_slice(&[0u8; 8]);
        let err = load_maze_bytes(&bytes, "trunc.maze").unwrap_err();
        assert!(matches!(err, LoadError::TruncatedBody { .. }));
    }

    #[test]
    fn round_trips_a_generated_maze() {
        let grid = recursive_backtracker(9, 13, Some(42));
        let bytes = write_maze_bytes(&grid, true);
        let maze = load_maze_bytes(&bytes, "roundtrip.maze").unwrap();

        assert_eq!(maze.width(), 13);
        assert_eq!(maze.height(), 9);
        for row in 0..9 {
            for col in 0..13 {
                let p = Position::new(row, col);
                for &d in &crate::position::ALL_DIRECTIONS {
                    assert_eq!(maze.grid().can_move(p, d), grid.can_move(p, d));
                }
            }
        }
    }

    #[test]
    fn odd_width_is_not_misread() {
        // width not a multiple of 16 exercises the "excess bits in the
        // last word of a row are ignored" rule.
        let grid = recursive_backtracker(5, 17, Some(7));
        let bytes = write_maze_bytes(&grid, true);
        let maze = load_maze_bytes(&bytes, "odd.maze").unwrap();
        assert_eq!(maze.width(), 17);
        assert_eq!(maze.height(), 5);
    }
}
