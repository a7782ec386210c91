//! Orthonormal two dimensional discrete cosine transform on 8x8 blocks.
//!
//! Matches `scipy.fftpack.dct(dct(block.T, norm='ortho').T, norm='ortho')` and its `idct`
//! counterpart, which is what OpenCV's `cv2.dct` computes for a single block.

use rustdct::{Dct2, Dct3, DctPlanner, RequiredScratch, TransformType2And3};
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// Width and height of the blocks the transform operates on.
pub const BLOCK_SIZE: usize = 8;

/// Number of samples in a block.
pub const BLOCK_AREA: usize = BLOCK_SIZE * BLOCK_SIZE;

/// The transform direction.
#[derive(PartialEq, Debug, Copy, Clone)]
pub enum Type {
    /// Forward transform, orthonormal DCT-II.
    DCT2,
    /// Inverse transform, orthonormal DCT-III.
    DCT3,
}

#[derive(PartialEq, Debug, Copy, Clone)]
enum Direction {
    Row,
    Column,
}

/// Perform an orthonormal discrete cosine transform over a square `size` x `size` block.
///
/// Data is assumed to be ordered row first and will be overwritten with the result. Rows are
/// always processed before columns, for the forward as well as the inverse transform.
pub fn dct2_2d(dct: &dyn TransformType2And3<f32>, dct_type: Type, size: usize, data: &mut [f32]) {
    assert_eq!(data.len(), size * size);

    // rustdct is unnormalized; these turn it into the orthonormal basis.
    let dc_scale = (1.0 / size as f32).sqrt();
    let ac_scale = (2.0 / size as f32).sqrt();

    // Intermediate row / column storage and the scratch buffer, shared by both passes.
    let mut tmp = vec![0f32; size];
    let mut scratch = vec![0f32; dct.get_scratch_len()];

    for current in [Direction::Row, Direction::Column] {
        let (step, skip_mult) = match current {
            Direction::Row => (1, size),
            Direction::Column => (size, 1),
        };

        for i in 0..size {
            // Copy the row or column into tmp.
            let line = data.iter().skip(i * skip_mult).step_by(step).take(size);
            for (out, orig) in tmp.iter_mut().zip(line) {
                *out = *orig;
            }

            match dct_type {
                Type::DCT2 => {
                    dct.process_dct2_with_scratch(&mut tmp, &mut scratch);
                    tmp[0] *= dc_scale;
                    tmp.iter_mut().skip(1).for_each(|v| *v *= ac_scale);
                }
                Type::DCT3 => {
                    // DCT-III halves the first term, so the DC gain needs twice the scale.
                    tmp[0] *= 2.0 * dc_scale;
                    tmp.iter_mut().skip(1).for_each(|v| *v *= ac_scale);
                    dct.process_dct3_with_scratch(&mut tmp, &mut scratch);
                }
            }

            // Copy tmp back into the data, overwriting the original input.
            let line_mut = data.iter_mut().skip(i * skip_mult).step_by(step).take(size);
            for (out, result) in line_mut.zip(tmp.iter()) {
                *out = *result;
            }
        }
    }
}

/// A coefficient position within a block, `row` is the vertical frequency.
#[derive(PartialEq, Eq, Debug, Copy, Clone, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    fn index(&self) -> usize {
        self.row * BLOCK_SIZE + self.col
    }
}

/// Transform domain representation of a single block.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct CoefficientGrid {
    data: [f32; BLOCK_AREA],
}

impl CoefficientGrid {
    pub fn from_raw(data: [f32; BLOCK_AREA]) -> Self {
        CoefficientGrid { data }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl Index<Position> for CoefficientGrid {
    type Output = f32;
    fn index(&self, position: Position) -> &f32 {
        &self.data[position.index()]
    }
}

impl IndexMut<Position> for CoefficientGrid {
    fn index_mut(&mut self, position: Position) -> &mut f32 {
        &mut self.data[position.index()]
    }
}

/// Forward and inverse transform for 8x8 blocks, planned once and shared between tiles.
#[derive(Clone)]
pub struct BlockTransform {
    dct: Arc<dyn TransformType2And3<f32>>,
}

impl BlockTransform {
    pub fn new() -> Self {
        let mut planner = DctPlanner::<f32>::new();
        BlockTransform {
            dct: planner.plan_dct2(BLOCK_SIZE),
        }
    }

    /// Samples to coefficients.
    pub fn forward(&self, samples: &[f32; BLOCK_AREA]) -> CoefficientGrid {
        let mut data = *samples;
        dct2_2d(self.dct.as_ref(), Type::DCT2, BLOCK_SIZE, &mut data);
        CoefficientGrid { data }
    }

    /// Coefficients back to (unclipped, unrounded) samples.
    pub fn inverse(&self, coefficients: &CoefficientGrid) -> [f32; BLOCK_AREA] {
        let mut data = coefficients.data;
        dct2_2d(self.dct.as_ref(), Type::DCT3, BLOCK_SIZE, &mut data);
        data
    }
}

impl Default for BlockTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlockTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockTransform")
            .field("size", &BLOCK_SIZE)
            .finish()
    }
}
