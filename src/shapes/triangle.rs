//! An indexed triangle mesh. `TriangleMesh` owns the shared per-vertex
//! arrays (already baked into world space at construction) and a single
//! `BSDF`/area-light assignment shared by every triangle in it; `Triangle`
//! is a cheap `Shape` view of one face, the unit the scene's shape list
//! actually stores and intersects.

use crate::bsdf::BSDF;
use crate::err_float::gamma;
use crate::geometry::bounds::Bounds3f;
use crate::geometry::transform::Transform;
use crate::geometry::{faceforward, max_dimension, permute_point, permute_vec, ComponentWiseExt, Normal3, Ray};
use crate::interaction::{DiffGeom, PositionSample, SurfaceInteraction};
use crate::math::{coordinate_system, Float};
use crate::shapes::Shape;
use crate::warp::square_to_uniform_triangle;
use crate::{Point2f, Point3f, Vec3f};
use cgmath::{EuclideanSpace, InnerSpace};
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;

pub struct TriangleMesh {
    pub n_triangles: u32,

    vertex_indices: Vec<u32>,
    vertices: Vec<Point3f>,
    normals: Option<Vec<Normal3>>,
    tangents: Option<Vec<Vec3f>>,
    tex_coords: Option<Vec<Point2f>>,

    reverse_orientation: bool,
    object_to_world: Transform,

    bsdf: Box<dyn BSDF>,
    area_light: AtomicIsize,
}

impl TriangleMesh {
    pub fn new(
        object_to_world: Transform,
        vertex_indices: Vec<u32>,
        mut vertices: Vec<Point3f>,
        mut normals: Option<Vec<Normal3>>,
        mut tangents: Option<Vec<Vec3f>>,
        tex_coords: Option<Vec<Point2f>>,
        reverse_orientation: bool,
        bsdf: Box<dyn BSDF>,
    ) -> Self {
        assert_eq!(vertex_indices.len() % 3, 0);
        let n_triangles = vertex_indices.len() as u32 / 3;
        let n_vertices = vertices.len();

        for v in &mut vertices {
            *v = object_to_world.transform(*v);
        }

        if let Some(ref mut normals) = normals {
            assert_eq!(normals.len(), n_vertices);
            for n in normals {
                *n = object_to_world.transform(*n);
            }
        }

        if let Some(ref mut tangents) = tangents {
            assert_eq!(tangents.len(), n_vertices);
            for t in tangents {
                *t = object_to_world.transform(*t);
            }
        }

        if let Some(ref tex_coords) = tex_coords {
            assert_eq!(tex_coords.len(), n_vertices);
        }

        Self {
            n_triangles,
            vertex_indices,
            vertices,
            normals,
            tangents,
            tex_coords,
            reverse_orientation,
            object_to_world,
            bsdf,
            area_light: AtomicIsize::new(-1),
        }
    }

    /// Loads a mesh from an OBJ file's first shape, as a convenience for
    /// test scenes and sample assets. Material assignment is left to the
    /// caller; only positions, normals, and texture coordinates are read.
    pub fn from_obj(
        path: &std::path::Path,
        object_to_world: Transform,
        reverse_orientation: bool,
        bsdf: Box<dyn BSDF>,
    ) -> anyhow::Result<Arc<Self>> {
        let (models, _materials) = tobj::load_obj(path)
            .map_err(|e| anyhow::anyhow!("loading obj {}: {:?}", path.display(), e))?;
        let model = models
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("obj file {} contains no meshes", path.display()))?;
        let mesh = model.mesh;

        let vertices = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Point3f::new(p[0] as Float, p[1] as Float, p[2] as Float))
            .collect();

        let normals = if mesh.normals.is_empty() {
            None
        } else {
            Some(
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| Normal3::new(n[0] as Float, n[1] as Float, n[2] as Float))
                    .collect(),
            )
        };

        let tex_coords = if mesh.texcoords.is_empty() {
            None
        } else {
            Some(
                mesh.texcoords
                    .chunks_exact(2)
                    .map(|uv| Point2f::new(uv[0] as Float, uv[1] as Float))
                    .collect(),
            )
        };

        Ok(Arc::new(TriangleMesh::new(
            object_to_world,
            mesh.indices,
            vertices,
            normals,
            None,
            tex_coords,
            reverse_orientation,
            bsdf,
        )))
    }

    pub fn iter_triangles(self: &Arc<Self>) -> impl Iterator<Item = Triangle> {
        (0..self.n_triangles).map({
            let mesh = Arc::clone(self);
            move |tri_id| Triangle::new(Arc::clone(&mesh), tri_id)
        })
    }
}

pub struct Triangle {
    mesh: Arc<TriangleMesh>,
    tri_id: u32,
}

impl Triangle {
    pub fn new(mesh: Arc<TriangleMesh>, tri_id: u32) -> Self {
        Self { mesh, tri_id }
    }

    fn vertex_indices(&self) -> [u32; 3] {
        let idx = self.tri_id as usize;
        [
            self.mesh.vertex_indices[3 * idx],
            self.mesh.vertex_indices[3 * idx + 1],
            self.mesh.vertex_indices[3 * idx + 2],
        ]
    }

    fn get_vertices(&self) -> [Point3f; 3] {
        let v = self.vertex_indices();
        [
            self.mesh.vertices[v[0] as usize],
            self.mesh.vertices[v[1] as usize],
            self.mesh.vertices[v[2] as usize],
        ]
    }

    fn get_vertices_as_vectors(&self) -> [Vec3f; 3] {
        let [p0, p1, p2] = self.get_vertices();
        [p0.to_vec(), p1.to_vec(), p2.to_vec()]
    }

    fn get_normals(&self) -> Option<[Normal3; 3]> {
        self.mesh.normals.as_ref().map(|normals| {
            let v = self.vertex_indices();
            [normals[v[0] as usize], normals[v[1] as usize], normals[v[2] as usize]]
        })
    }

    fn get_uvs(&self) -> [Point2f; 3] {
        self.mesh.tex_coords.as_ref().map_or_else(
            || [(0.0, 0.0).into(), (1.0, 0.0).into(), (1.0, 1.0).into()],
            |uvs| {
                let v = self.vertex_indices();
                [uvs[v[0] as usize], uvs[v[1] as usize], uvs[v[2] as usize]]
            },
        )
    }

    /// Whether the geometric normal needs to be flipped: an explicit
    /// `reverseOrientation` flag and a handedness-swapping transform each
    /// flip it once, so the two cancel when both are true.
    fn flip_normals(&self) -> bool {
        self.mesh.reverse_orientation ^ self.mesh.object_to_world.swaps_handedness()
    }
}

impl Shape for Triangle {
    fn object_bound(&self) -> Bounds3f {
        self.world_bound()
    }

    fn world_bound(&self) -> Bounds3f {
        let [p0, p1, p2] = self.get_vertices();
        Bounds3f::empty().join_point(p0).join_point(p1).join_point(p2)
    }

    fn object_to_world(&self) -> &Transform {
        &self.mesh.object_to_world
    }

    fn reverse_orientation(&self) -> bool {
        self.mesh.reverse_orientation
    }

    fn area(&self) -> Float {
        let [p0, p1, p2] = self.get_vertices();
        0.5 * (p1 - p0).cross(p2 - p0).magnitude()
    }

    fn intersect(&self, ray: &Ray) -> Option<(Float, SurfaceInteraction)> {
        let [p0, p1, p2] = self.get_vertices();

        // Translate vertices so the ray origin is at (0, 0, 0)...
        let mut p0t = p0 - ray.origin.to_vec();
        let mut p1t = p1 - ray.origin.to_vec();
        let mut p2t = p2 - ray.origin.to_vec();

        // ...then permute axes so the ray direction's largest component is z...
        let kz = max_dimension(ray.dir.abs());
        let kx = (kz + 1) % 3;
        let ky = (kx + 1) % 3;
        let dir = permute_vec(ray.dir, kx, ky, kz);
        p0t = permute_point(p0t, kx, ky, kz);
        p1t = permute_point(p1t, kx, ky, kz);
        p2t = permute_point(p2t, kx, ky, kz);

        // ...and shear x/y so the ray aligns with +z. The z shear is applied
        // only once we know the ray actually hits.
        let shear_x = -dir.x / dir.z;
        let shear_y = -dir.y / dir.z;
        let shear_z = 1.0 / dir.z;
        p0t.x += shear_x * p0t.z;
        p0t.y += shear_y * p0t.z;
        p1t.x += shear_x * p1t.z;
        p1t.y += shear_y * p1t.z;
        p2t.x += shear_x * p2t.z;
        p2t.y += shear_y * p2t.z;

        let mut e0 = p1t.x * p2t.y - p1t.y * p2t.x;
        let mut e1 = p2t.x * p0t.y - p2t.y * p0t.x;
        let mut e2 = p0t.x * p1t.y - p0t.y * p1t.x;

        if e0 == 0.0 || e1 == 0.0 || e2 == 0.0 {
            e0 = (p1t.x as f64 * p2t.y as f64 - p1t.y as f64 * p2t.x as f64) as Float;
            e1 = (p2t.x as f64 * p0t.y as f64 - p2t.y as f64 * p0t.x as f64) as Float;
            e2 = (p0t.x as f64 * p1t.y as f64 - p0t.y as f64 * p1t.x as f64) as Float;
        }

        if sign_differs(e0, e1, e2) {
            return None;
        }

        let det = e0 + e1 + e2;
        if det == 0.0 {
            return None;
        }

        p0t.z *= shear_z;
        p1t.z *= shear_z;
        p2t.z *= shear_z;
        let t_scaled = e0 * p0t.z + e1 * p1t.z + e2 * p2t.z;
        if det < 0.0 && (t_scaled >= 0.0 || t_scaled < ray.t_max * det)
            || det > 0.0 && (t_scaled <= 0.0 || t_scaled > ray.t_max * det)
        {
            return None;
        }

        let inv_det = 1.0 / det;
        let b0 = e0 * inv_det;
        let b1 = e1 * inv_det;
        let b2 = e2 * inv_det;
        let t = t_scaled * inv_det;

        let max_zt = p0t.z.abs().max(p1t.z.abs()).max(p2t.z.abs());
        let delta_z = gamma(3) * max_zt;

        let max_xt = p0t.x.abs().max(p1t.x.abs()).max(p2t.x.abs());
        let max_yt = p0t.y.abs().max(p1t.y.abs()).max(p2t.y.abs());
        let delta_x = gamma(5) * (max_xt + max_zt);
        let delta_y = gamma(5) * (max_yt + max_zt);

        let delta_e = 2.0 * (gamma(2) * max_xt * max_yt + delta_y * max_xt + delta_x * max_yt);

        let max_e = e0.abs().max(e1.abs()).max(e2.abs());
        let delta_t =
            3.0 * (gamma(3) * max_e * max_zt + delta_e * max_zt + delta_z * max_e) * inv_det.abs();
        if t <= delta_t {
            return None;
        }

        let uv = self.get_uvs();
        let duv02 = uv[0] - uv[2];
        let duv12 = uv[1] - uv[2];
        let dp02 = p0 - p2;
        let dp12 = p1 - p2;

        let determinant = duv02[0] * duv12[1] - duv02[1] * duv12[0];
        let degenerate_uv = determinant.abs() < 1.0e-8;

        let (dpdu, dpdv) = if degenerate_uv {
            let ng = (p2 - p0).cross(p1 - p0);
            if ng.magnitude2() == 0.0 {
                return None;
            }
            coordinate_system(ng.normalize())
        } else {
            let inv_det = 1.0 / determinant;
            let dpdu = (duv12[1] * dp02 - duv02[1] * dp12) * inv_det;
            let dpdv = (-duv12[0] * dp02 + duv02[0] * dp12) * inv_det;
            (dpdu, dpdv)
        };

        let x_abs_sum = (b0 * p0.x).abs() + (b1 * p1.x).abs() + (b2 * p2.x).abs();
        let y_abs_sum = (b0 * p0.y).abs() + (b1 * p1.y).abs() + (b2 * p2.y).abs();
        let z_abs_sum = (b0 * p0.z).abs() + (b1 * p1.z).abs() + (b2 * p2.z).abs();
        let p_err = gamma(7) * Vec3f::new(x_abs_sum, y_abs_sum, z_abs_sum);

        let p_hit = Point3f::from_vec(b0 * p0.to_vec() + b1 * p1.to_vec() + b2 * p2.to_vec());
        let uv_hit = Point2f::from_vec(b0 * uv[0].to_vec() + b1 * uv[1].to_vec() + b2 * uv[2].to_vec());

        let diff_geom = DiffGeom {
            dpdu,
            dpdv,
            dndu: Normal3::new(0.0, 0.0, 0.0),
            dndv: Normal3::new(0.0, 0.0, 0.0),
        };

        let mut geom_normal = Normal3(dp02.cross(dp12).normalize());
        if self.flip_normals() {
            geom_normal = geom_normal * -1.0;
        }

        let mut isect =
            SurfaceInteraction::new(p_hit, p_err, ray.time, uv_hit, -ray.dir, geom_normal, diff_geom, self);

        if self.mesh.normals.is_some() || self.mesh.tangents.is_some() {
            let v = self.vertex_indices();

            let ns = if let Some(normals) = &self.mesh.normals {
                Normal3(
                    (normals[v[0] as usize].0 * b0 + normals[v[1] as usize].0 * b1 + normals[v[2] as usize].0 * b2)
                        .normalize(),
                )
            } else {
                isect.hit.n
            };

            let ss = if let Some(tangents) = &self.mesh.tangents {
                (b0 * tangents[v[0] as usize] + b1 * tangents[v[1] as usize] + b2 * tangents[v[2] as usize])
                    .normalize()
            } else {
                isect.geom.dpdu.normalize()
            };

            let ts = ns.cross(ss);
            let (ts, ss) = if ts.magnitude2() > 0.0 {
                let ts = ts.normalize();
                let ss = ts.cross(ns.0);
                (ts, ss)
            } else {
                coordinate_system(ns.0)
            };

            let (dndu, dndv) = if let Some(normals) = &self.mesh.normals {
                let dn1 = normals[v[0] as usize] - normals[v[2] as usize];
                let dn2 = normals[v[1] as usize] - normals[v[2] as usize];

                if degenerate_uv {
                    let dn = (normals[v[2] as usize] - normals[v[0] as usize])
                        .0
                        .cross((normals[v[1] as usize] - normals[v[0] as usize]).0);
                    if dn.magnitude2() == 0.0 {
                        (Normal3::new(0.0, 0.0, 0.0), Normal3::new(0.0, 0.0, 0.0))
                    } else {
                        let (dndu, dndv) = coordinate_system(dn);
                        (Normal3(dndu), Normal3(dndv))
                    }
                } else {
                    let dndu = (dn1 * duv12[1] - dn2 * duv02[1]) * inv_det;
                    let dndv = (dn2 * duv02[0] - dn1 * duv12[0]) * inv_det;
                    (dndu, dndv)
                }
            } else {
                (Normal3::new(0.0, 0.0, 0.0), Normal3::new(0.0, 0.0, 0.0))
            };

            isect.shading_geom = DiffGeom { dpdu: ss, dpdv: ts, dndu, dndv };
            isect.shading_n = ns;
            isect.hit.n = Normal3(faceforward(isect.hit.n.0, isect.shading_n.0));
        }

        Some((t, isect))
    }

    fn sample_area(&self, u: Point2f) -> PositionSample {
        let b = square_to_uniform_triangle(u);
        let b0 = b.x;
        let b1 = b.y;
        let b2 = 1.0 - b0 - b1;
        let [p0, p1, p2] = self.get_vertices_as_vectors();
        let p = b0 * p0 + b1 * p1 + b2 * p2;

        let ng = Normal3((p1 - p0).cross(p2 - p0).normalize());
        let n = if let Some([n0, n1, n2]) = self.get_normals() {
            Normal3(faceforward(ng.0, n0.0 * b0 + n1.0 * b1 + n2.0 * b2))
        } else if self.flip_normals() {
            ng * -1.0
        } else {
            ng
        };

        let uvs = self.get_uvs();
        let uv = Point2f::from_vec(b0 * uvs[0].to_vec() + b1 * uvs[1].to_vec() + b2 * uvs[2].to_vec());

        PositionSample {
            p: Point3f::from_vec(p),
            n,
            uv,
            pdf_area: 1.0 / self.area(),
            delta: false,
        }
    }

    fn bsdf(&self) -> &dyn BSDF {
        self.mesh.bsdf.as_ref()
    }

    fn area_light_index(&self) -> Option<usize> {
        let v = self.mesh.area_light.load(Ordering::Relaxed);
        if v < 0 {
            None
        } else {
            Some(v as usize)
        }
    }

    fn mark_area_light(&self, idx: usize) {
        self.mesh.area_light.store(idx as isize, Ordering::Relaxed);
    }
}

#[inline]
fn sign_differs(v1: Float, v2: Float, v3: Float) -> bool {
    // Differs from `(v1 < 0.0 || ...) && (v1 > 0.0 || ...)` only in how
    // signed zero is classified, which the caller already treats as
    // "inside" by falling through to the determinant check.
    v1.is_sign_positive() != v2.is_sign_positive() || v2.is_sign_positive() != v3.is_sign_positive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsdf::diffuse::DiffuseBSDF;
    use crate::spectrum::Spectrum;

    #[test]
    fn test_sign_differs() {
        assert_eq!(sign_differs(1.0, 2.0, -1.0), true);
        assert_eq!(sign_differs(1.0, 2.0, 1.0), false);
        assert_eq!(sign_differs(-1.0, -2.0, 1.0), true);
        assert_eq!(sign_differs(-1.0, -2.0, -1.0), false);
        assert_eq!(sign_differs(-1.0, 2.0, -1.0), true);
        assert_eq!(sign_differs(-1.0, 2.0, 1.0), true);
        assert_eq!(sign_differs(0.0, 0.0, 0.0), false);
        assert_eq!(sign_differs(0.0, 0.0, -0.0), true);
    }

    fn single_triangle() -> Arc<TriangleMesh> {
        Arc::new(TriangleMesh::new(
            Transform::IDENTITY,
            vec![0, 1, 2],
            vec![
                Point3f::new(-1.0, -1.0, 0.0),
                Point3f::new(1.0, -1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            None,
            None,
            None,
            false,
            Box::new(DiffuseBSDF::new(Spectrum::new(0.5))),
        ))
    }

    #[test]
    fn ray_through_the_face_hits_it() {
        let mesh = single_triangle();
        let tri = mesh.iter_triangles().next().unwrap();
        let ray = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vec3f::new(0.0, 0.0, 1.0));
        let (t, si) = tri.intersect(&ray).expect("should hit");
        assert!((t - 5.0).abs() < 1e-4);
        assert!(si.hit.n.z.abs() > 0.99);
    }

    #[test]
    fn ray_outside_the_face_misses() {
        let mesh = single_triangle();
        let tri = mesh.iter_triangles().next().unwrap();
        let ray = Ray::new(Point3f::new(5.0, 5.0, -5.0), Vec3f::new(0.0, 0.0, 1.0));
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn sampled_points_lie_in_the_triangle_plane() {
        let mesh = single_triangle();
        let tri = mesh.iter_triangles().next().unwrap();
        for i in 0..16 {
            let u = Point2f::new((i as Float + 0.5) / 16.0, 0.37);
            let ps = tri.sample_area(u);
            assert!(ps.p.z.abs() < 1e-4);
        }
    }
}
