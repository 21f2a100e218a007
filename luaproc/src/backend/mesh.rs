use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};

use super::Rect;
use crate::canvas::{Camera2D, Camera3D, Color, Projection};

const SPHERE_RINGS: u32 = 16;
const SPHERE_SLICES: u32 = 16;
const OUTLINE_LIFT: f32 = 0.001;
const PLANE_2D_DEPTH: f32 = 1000.0;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub fn color_to_rgba(color: Color) -> [f32; 4] {
    [
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        color.a as f32 / 255.0,
    ]
}

/// Maps screen coordinates (origin top-left, y down) to clip space.
pub fn view_projection_2d(camera: &Camera2D, width: f32, height: f32) -> Mat4 {
    let projection = Mat4::orthographic_rh(
        0.0,
        width,
        height,
        0.0,
        -PLANE_2D_DEPTH,
        PLANE_2D_DEPTH,
    );
    let view = Mat4::from_translation(camera.offset.extend(0.0))
        * Mat4::from_rotation_z(camera.rotation.to_radians())
        * Mat4::from_scale(Vec3::new(camera.zoom, camera.zoom, 1.0))
        * Mat4::from_translation((-camera.target).extend(0.0));
    projection * view
}

pub fn view_projection_3d(camera: &Camera3D, aspect: f32) -> Mat4 {
    let view = Mat4::look_at_rh(camera.position, camera.target, camera.up);
    let projection = match camera.projection {
        Projection::Perspective => Mat4::perspective_rh(
            camera.fov_angle,
            aspect,
            camera.near.max(f32::EPSILON),
            camera.far,
        ),
        Projection::Orthographic => {
            let half_height = camera.fovy / 2.0;
            let half_width = half_height * aspect;
            Mat4::orthographic_rh(
                -half_width,
                half_width,
                -half_height,
                half_height,
                camera.near,
                camera.far,
            )
        }
    };
    projection * view
}

/// Immediate-mode geometry for one frame. Positions are already in world
/// space; the model matrix is applied while tessellating.
#[derive(Debug, Default)]
pub struct MeshBatch {
    pub triangles: Vec<Vertex>,
    pub lines: Vec<Vertex>,
}

impl MeshBatch {
    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.lines.is_empty()
    }

    fn vertex(model: &Mat4, point: Vec3, color: [f32; 4]) -> Vertex {
        Vertex {
            position: model.transform_point3(point).to_array(),
            color,
        }
    }

    pub fn triangle(&mut self, model: &Mat4, points: [Vec3; 3], color: Color) {
        let color = color_to_rgba(color);
        self.triangles
            .extend(points.map(|point| Self::vertex(model, point, color)));
    }

    /// Corners in winding order.
    pub fn quad(&mut self, model: &Mat4, corners: [Vec3; 4], color: Color) {
        let [a, b, c, d] = corners;
        self.triangle(model, [a, b, c], color);
        self.triangle(model, [a, c, d], color);
    }

    pub fn line(&mut self, model: &Mat4, start: Vec3, end: Vec3, color: Color) {
        let color = color_to_rgba(color);
        self.lines.push(Self::vertex(model, start, color));
        self.lines.push(Self::vertex(model, end, color));
    }

    pub fn rect(&mut self, model: &Mat4, rect: Rect, z: f32, color: Color) {
        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.x + rect.width, rect.y + rect.height);
        self.quad(
            model,
            [
                Vec3::new(x0, y0, z),
                Vec3::new(x1, y0, z),
                Vec3::new(x1, y1, z),
                Vec3::new(x0, y1, z),
            ],
            color,
        );
    }

    /// Four bands of `thickness` along the inside of `rect`, lifted just
    /// above its plane.
    pub fn rect_outline(
        &mut self,
        model: &Mat4,
        rect: Rect,
        z: f32,
        thickness: f32,
        color: Color,
    ) {
        if thickness <= 0.0 {
            return;
        }
        let z = z + OUTLINE_LIFT;
        let t = thickness.min(rect.width.abs()).min(rect.height.abs());
        let right = rect.x + rect.width - t;
        let bottom = rect.y + rect.height - t;

        for band in [
            Rect::new(rect.x, rect.y, rect.width, t),
            Rect::new(rect.x, bottom, rect.width, t),
            Rect::new(rect.x, rect.y, t, rect.height),
            Rect::new(right, rect.y, t, rect.height),
        ] {
            self.rect(model, band, z, color);
        }
    }

    fn cuboid_corners(size: Vec3) -> [Vec3; 8] {
        let h = size / 2.0;
        [
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ]
    }

    /// Axis-aligned box centered on the model origin.
    pub fn cuboid(&mut self, model: &Mat4, size: Vec3, color: Color) {
        let c = Self::cuboid_corners(size);
        for [a, b, cc, d] in [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [3, 7, 6, 2],
            [0, 4, 7, 3],
            [1, 2, 6, 5],
        ] {
            self.quad(model, [c[a], c[b], c[cc], c[d]], color);
        }
    }

    pub fn cuboid_wires(&mut self, model: &Mat4, size: Vec3, color: Color) {
        let c = Self::cuboid_corners(size);
        for (a, b) in [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ] {
            self.line(model, c[a], c[b], color);
        }
    }

    /// UV sphere centered on the model origin.
    pub fn sphere(&mut self, model: &Mat4, radius: f32, color: Color) {
        let point = |ring: u32, slice: u32| {
            let polar = PI * ring as f32 / SPHERE_RINGS as f32;
            let azimuth = TAU * slice as f32 / SPHERE_SLICES as f32;
            let ring_radius = polar.sin() * radius;
            Vec3::new(
                ring_radius * azimuth.cos(),
                polar.cos() * radius,
                ring_radius * azimuth.sin(),
            )
        };

        for ring in 0..SPHERE_RINGS {
            for slice in 0..SPHERE_SLICES {
                let a = point(ring, slice);
                let b = point(ring + 1, slice);
                let c = point(ring + 1, slice + 1);
                let d = point(ring, slice + 1);
                self.quad(model, [a, b, c, d], color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn clip(matrix: Mat4, point: Vec3) -> Vec3 {
        let p = matrix * Vec4::new(point.x, point.y, point.z, 1.0);
        p.truncate() / p.w
    }

    #[test]
    fn rect_is_two_triangles() {
        let mut batch = MeshBatch::default();
        let rect = Rect::new(0.0, 0.0, 2.0, 1.0);
        batch.rect(&Mat4::IDENTITY, rect, 0.5, Color::gray(255));
        assert_eq!(batch.triangles.len(), 6);
        assert!(batch.triangles.iter().all(|v| v.position[2] == 0.5));
        assert!(batch.lines.is_empty());
    }

    #[test]
    fn model_matrix_is_applied() {
        let mut batch = MeshBatch::default();
        let model = Mat4::from_translation(Vec3::new(10.0, 20.0, 0.0));
        batch.line(&model, Vec3::ZERO, Vec3::X, Color::gray(0));
        assert_eq!(batch.lines[0].position, [10.0, 20.0, 0.0]);
        assert_eq!(batch.lines[1].position, [11.0, 20.0, 0.0]);
    }

    #[test]
    fn box_and_wires_vertex_counts() {
        let mut batch = MeshBatch::default();
        batch.cuboid(&Mat4::IDENTITY, Vec3::ONE, Color::gray(255));
        batch.cuboid_wires(&Mat4::IDENTITY, Vec3::ONE, Color::gray(0));
        assert_eq!(batch.triangles.len(), 36);
        assert_eq!(batch.lines.len(), 24);
    }

    #[test]
    fn outline_sits_above_fill() {
        let mut batch = MeshBatch::default();
        batch.rect_outline(
            &Mat4::IDENTITY,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            0.0,
            1.0,
            Color::gray(0),
        );
        assert_eq!(batch.triangles.len(), 24);
        assert!(batch.triangles.iter().all(|v| v.position[2] > 0.0));
    }

    #[test]
    fn screen_space_maps_to_clip_corners() {
        let camera = Camera2D::centered(640.0, 360.0);
        let matrix = view_projection_2d(&camera, 640.0, 360.0);

        let top_left = clip(matrix, Vec3::ZERO);
        assert!((top_left.x + 1.0).abs() < 1e-5);
        assert!((top_left.y - 1.0).abs() < 1e-5);

        let bottom_right = clip(matrix, Vec3::new(640.0, 360.0, 0.0));
        assert!((bottom_right.x - 1.0).abs() < 1e-5);
        assert!((bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn perspective_target_is_screen_center() {
        let camera = Camera3D::framing(640.0, 360.0);
        let matrix = view_projection_3d(&camera, 640.0 / 360.0);

        let center = clip(matrix, camera.target);
        assert!(center.x.abs() < 1e-4 && center.y.abs() < 1e-4);

        // The framed height lands exactly on the top edge.
        let top = clip(matrix, camera.target + Vec3::new(0.0, 180.0, 0.0));
        assert!((top.y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn color_is_normalized() {
        assert_eq!(
            color_to_rgba(Color::new(255, 0, 51, 255)),
            [1.0, 0.0, 0.2, 1.0]
        );
    }
}
