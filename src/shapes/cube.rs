use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::{Point2f, Point3f};
use crate::core::shape::Shape;

/// Fill a shape with a unit cube centered at the origin, four vertices and
/// two triangles per face so normals and texture coordinates stay per-face.
/// Debug geometry for the "cube" shape subtype.
pub fn make_cube(shp: &mut Shape) {
    // (normal, four corners in winding order)
    const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, 1.0],
            [
                [-0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
                [0.5, 0.5, 0.5],
                [-0.5, 0.5, 0.5],
            ],
        ),
        (
            [0.0, 0.0, -1.0],
            [
                [0.5, -0.5, -0.5],
                [-0.5, -0.5, -0.5],
                [-0.5, 0.5, -0.5],
                [0.5, 0.5, -0.5],
            ],
        ),
        (
            [1.0, 0.0, 0.0],
            [
                [0.5, -0.5, 0.5],
                [0.5, -0.5, -0.5],
                [0.5, 0.5, -0.5],
                [0.5, 0.5, 0.5],
            ],
        ),
        (
            [-1.0, 0.0, 0.0],
            [
                [-0.5, -0.5, -0.5],
                [-0.5, -0.5, 0.5],
                [-0.5, 0.5, 0.5],
                [-0.5, 0.5, -0.5],
            ],
        ),
        (
            [0.0, 1.0, 0.0],
            [
                [-0.5, 0.5, 0.5],
                [0.5, 0.5, 0.5],
                [0.5, 0.5, -0.5],
                [-0.5, 0.5, -0.5],
            ],
        ),
        (
            [0.0, -1.0, 0.0],
            [
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, -0.5, 0.5],
                [-0.5, -0.5, 0.5],
            ],
        ),
    ];

    const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    for (normal, corners) in FACES.iter() {
        let base = shp.pos.len() as u32;

        for (corner, uv) in corners.iter().zip(CORNER_UVS.iter()) {
            shp.pos.push(Point3f::new(corner[0], corner[1], corner[2]));
            shp.norm.push(Normal3f::new(normal[0], normal[1], normal[2]));
            shp.texcoord.push(Point2f::new(uv[0], uv[1]));
        }

        shp.triangles.push([base, base + 1, base + 2]);
        shp.triangles.push([base, base + 2, base + 3]);
    }
}
