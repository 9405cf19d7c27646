//! Voxel index translation
//!
//! Converts between voxel indices, linear data offsets and stereotaxic
//! coordinates for the voxels mapped by one axis. Most volumes map only a
//! small subset of their bounding box, so offsets live in a hash map keyed by
//! the linear voxel index rather than a dense array.

use std::cell::OnceCell;

use brainmap_core::{VolumeSpace, VoxelIjk};
use hashbrown::HashMap;

/// Bidirectional voxel index, data offset and coordinate translation
#[derive(Debug, Clone)]
pub struct VoxelIndexTranslator {
    space: VolumeSpace,
    /// Inverse of the affine, first three rows
    inverse: [[f64; 4]; 3],
    /// Mapped voxels with their data offsets, in offset order
    voxels: Vec<(VoxelIjk, usize)>,
    lookup: OnceCell<HashMap<u64, usize>>,
}

impl VoxelIndexTranslator {
    /// Build a translator from mapped voxels and their offsets
    ///
    /// Fails when the dimensions are not positive or their voxel count
    /// overflows, a voxel lies outside the volume dimensions or the affine
    /// cannot be inverted.
    pub fn new(space: VolumeSpace, voxels: Vec<(VoxelIjk, usize)>) -> Result<Self, String> {
        if space.dimensions.iter().any(|&d| d <= 0) {
            return Err(format!("volume dimensions {:?} must be positive", space.dimensions));
        }
        let [di, dj, dk] = space.dimensions;
        if di.checked_mul(dj).and_then(|n| n.checked_mul(dk)).is_none() {
            return Err(format!("volume dimensions {:?} are too large", space.dimensions));
        }
        if let Some((ijk, _)) = voxels.iter().find(|(ijk, _)| !space.contains(*ijk)) {
            return Err(format!(
                "voxel {ijk:?} lies outside volume dimensions {:?}",
                space.dimensions
            ));
        }
        let inverse = invert_affine(&space.sform)
            .ok_or_else(|| String::from("volume affine is not invertible"))?;

        Ok(Self {
            space,
            inverse,
            voxels,
            lookup: OnceCell::new(),
        })
    }

    /// Whether any voxels are mapped
    pub fn has_volume(&self) -> bool {
        !self.voxels.is_empty()
    }

    /// Get the volume dimensions
    pub fn dimensions(&self) -> [i64; 3] {
        self.space.dimensions
    }

    /// Get the volume space
    pub fn space(&self) -> &VolumeSpace {
        &self.space
    }

    /// Number of mapped voxels
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    /// Mapped voxels with their offsets, in offset order
    pub fn voxels(&self) -> &[(VoxelIjk, usize)] {
        &self.voxels
    }

    /// Convert a voxel index to stereotaxic coordinates
    pub fn index_to_space(&self, ijk: VoxelIjk) -> [f32; 3] {
        let m = &self.space.sform;
        let (i, j, k) = (ijk[0] as f32, ijk[1] as f32, ijk[2] as f32);
        [
            m[0][0] * i + m[0][1] * j + m[0][2] * k + m[0][3],
            m[1][0] * i + m[1][1] * j + m[1][2] * k + m[1][3],
            m[2][0] * i + m[2][1] * j + m[2][2] * k + m[2][3],
        ]
    }

    /// Convert stereotaxic coordinates to the nearest voxel index
    ///
    /// The result may lie outside the volume.
    pub fn space_to_index(&self, xyz: [f32; 3]) -> VoxelIjk {
        let m = &self.inverse;
        let (x, y, z) = (xyz[0] as f64, xyz[1] as f64, xyz[2] as f64);
        let mut ijk = [0i64; 3];
        for (axis, row) in m.iter().enumerate() {
            let value = row[0] * x + row[1] * y + row[2] * z + row[3];
            ijk[axis] = value.round() as i64;
        }
        ijk
    }

    /// Nearest voxel index to a coordinate, if inside the volume
    pub fn enclosing_voxel(&self, xyz: [f32; 3]) -> Option<VoxelIjk> {
        let ijk = self.space_to_index(xyz);
        self.space.contains(ijk).then_some(ijk)
    }

    /// Data offset of a voxel, `None` if it is not mapped
    pub fn offset_for_indices(&self, i: i64, j: i64, k: i64) -> Option<usize> {
        let key = self.linear_index([i, j, k])?;
        self.lookup().get(&key).copied()
    }

    fn lookup(&self) -> &HashMap<u64, usize> {
        self.lookup.get_or_init(|| {
            let mut map = HashMap::with_capacity(self.voxels.len());
            for &(ijk, offset) in &self.voxels {
                if let Some(key) = self.linear_index(ijk) {
                    map.insert(key, offset);
                }
            }
            map
        })
    }

    fn linear_index(&self, ijk: VoxelIjk) -> Option<u64> {
        if !self.space.contains(ijk) {
            return None;
        }
        let [di, dj, _] = self.space.dimensions;
        let plane = ijk[2].checked_mul(di)?.checked_mul(dj)?;
        let row = ijk[1].checked_mul(di)?;
        let index = ijk[0].checked_add(row)?.checked_add(plane)?;
        u64::try_from(index).ok()
    }
}

/// Invert the 3x4 affine of a 4x4 matrix whose last row is `0 0 0 1`
fn invert_affine(m: &[[f32; 4]; 3]) -> Option<[[f64; 4]; 3]> {
    let a = |r: usize, c: usize| m[r][c] as f64;
    let det = a(0, 0) * (a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1))
        - a(0, 1) * (a(1, 0) * a(2, 2) - a(1, 2) * a(2, 0))
        + a(0, 2) * (a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0));
    if det.abs() < f64::EPSILON {
        return None;
    }

    let mut inv = [[0.0f64; 4]; 3];
    inv[0][0] = (a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1)) / det;
    inv[0][1] = (a(0, 2) * a(2, 1) - a(0, 1) * a(2, 2)) / det;
    inv[0][2] = (a(0, 1) * a(1, 2) - a(0, 2) * a(1, 1)) / det;
    inv[1][0] = (a(1, 2) * a(2, 0) - a(1, 0) * a(2, 2)) / det;
    inv[1][1] = (a(0, 0) * a(2, 2) - a(0, 2) * a(2, 0)) / det;
    inv[1][2] = (a(0, 2) * a(1, 0) - a(0, 0) * a(1, 2)) / det;
    inv[2][0] = (a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0)) / det;
    inv[2][1] = (a(0, 1) * a(2, 0) - a(0, 0) * a(2, 1)) / det;
    inv[2][2] = (a(0, 0) * a(1, 1) - a(0, 1) * a(1, 0)) / det;

    // Translation: -R^-1 * t
    for r in 0..3 {
        inv[r][3] = -(inv[r][0] * a(0, 3) + inv[r][1] * a(1, 3) + inv[r][2] * a(2, 3));
    }
    Some(inv)
}
