pub struct Mesh {
    /// Interleaved position + normal, 6 floats per vertex.
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Procedural UV sphere centered on the origin. Normals point outward,
    /// so a translation-only model matrix keeps them valid in world space.
    pub fn sphere(radius: f32, segments: u16, rings: u16) -> Self {
        let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1) * 6) as usize);
        let mut indices = Vec::with_capacity((rings * segments * 6) as usize);

        for ring in 0..=rings {
            let theta = std::f32::consts::PI * ring as f32 / rings as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            for seg in 0..=segments {
                let phi = std::f32::consts::TAU * seg as f32 / segments as f32;
                let (sin_p, cos_p) = phi.sin_cos();

                let nx = sin_t * cos_p;
                let ny = cos_t;
                let nz = sin_t * sin_p;
                vertices.extend_from_slice(&[
                    radius * nx, radius * ny, radius * nz,
                    nx, ny, nz,
                ]);
            }
        }

        let stride = segments + 1;
        for ring in 0..rings {
            for seg in 0..segments {
                let a = ring * stride + seg;
                let b = a + stride;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        Mesh { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertex_and_index_counts() {
        let mesh = Mesh::sphere(2.0, 16, 12);
        assert_eq!(mesh.vertices.len(), 17 * 13 * 6);
        assert_eq!(mesh.indices.len(), 16 * 12 * 6);

        let vertex_count = (mesh.vertices.len() / 6) as u16;
        assert!(mesh.indices.iter().all(|&i| i < vertex_count));
    }

    #[test]
    fn sphere_vertices_lie_on_radius_with_unit_normals() {
        let radius = 3.5;
        let mesh = Mesh::sphere(radius, 12, 8);
        for chunk in mesh.vertices.chunks_exact(6) {
            let pos_len = (chunk[0] * chunk[0] + chunk[1] * chunk[1] + chunk[2] * chunk[2]).sqrt();
            let n_len = (chunk[3] * chunk[3] + chunk[4] * chunk[4] + chunk[5] * chunk[5]).sqrt();
            assert!((pos_len - radius).abs() < 1e-3);
            assert!((n_len - 1.0).abs() < 1e-4);
        }
    }
}
