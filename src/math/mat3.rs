//! 3x3 matrix used for the camera view basis and for solving the
//! ray/triangle barycentric linear system.

use std::ops::Mul;

use crate::math::vec3::Vec3;

/// Row-major 3x3 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    m: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub const fn new(m: [[f32; 3]; 3]) -> Self {
        Self { m }
    }

    /// Builds a matrix from three column vectors.
    pub fn from_columns(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            m: [[a.x, b.x, c.x], [a.y, b.y, c.y], [a.z, b.z, c.z]],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row][col]
    }

    pub fn column(&self, col: usize) -> Vec3 {
        Vec3::new(self.m[0][col], self.m[1][col], self.m[2][col])
    }

    pub fn transpose(&self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, value) in out_row.iter_mut().enumerate() {
                *value = self.m[col][row];
            }
        }
        Self { m: out }
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse via the adjugate. Returns `None` for singular matrices,
    /// which the intersection code treats as "ray parallel to triangle".
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let m = &self.m;
        let mut out = [[0.0; 3]; 3];
        out[0][0] = (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det;
        out[0][1] = (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det;
        out[0][2] = (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det;
        out[1][0] = (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det;
        out[1][1] = (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det;
        out[1][2] = (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det;
        out[2][0] = (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det;
        out[2][1] = (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det;
        out[2][2] = (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det;
        Some(Self { m: out })
    }
}

/// Matrix times column vector.
impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(
            self.m[0][0] * rhs.x + self.m[0][1] * rhs.y + self.m[0][2] * rhs.z,
            self.m[1][0] * rhs.x + self.m[1][1] * rhs.y + self.m[1][2] * rhs.z,
            self.m[2][0] * rhs.x + self.m[2][1] * rhs.y + self.m[2][2] * rhs.z,
        )
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Self::Output {
        let mut out = [[0.0; 3]; 3];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, value) in out_row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.m[row][k] * rhs.m[k][col]).sum();
            }
        }
        Self { m: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_is_neutral() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let out = Mat3::IDENTITY * v;
        assert_relative_eq!(out.x, v.x);
        assert_relative_eq!(out.y, v.y);
        assert_relative_eq!(out.z, v.z);
    }

    #[test]
    fn inverse_times_original_is_identity() {
        let m = Mat3::new([[2.0, 0.0, 1.0], [0.0, 3.0, 0.0], [1.0, 0.0, 1.0]]);
        let inv = m.inverse().unwrap();
        let product = m * inv;
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_relative_eq!(product.get(row, col), expected, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Mat3::new([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 0.0]]);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn from_columns_round_trips() {
        let m = Mat3::from_columns(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(7.0, 8.0, 9.0),
        );
        let col = m.column(1);
        assert_relative_eq!(col.x, 4.0);
        assert_relative_eq!(col.y, 5.0);
        assert_relative_eq!(col.z, 6.0);
    }
}
