use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::{Point2f, Point3f};
use crate::core::shape::Shape;

/// Fill a shape from the buffers of a "trianglemesh" directive. Indices
/// arrive as a flat list already validated to a multiple of three; texture
/// coordinates arrive as a flat list of u,v pairs.
pub fn fill_trianglemesh(
    shp: &mut Shape,
    indices: &[i32],
    pos: &[Point3f],
    norm: &[Normal3f],
    uv: &[f32],
) {
    for tri in indices.chunks(3) {
        shp.triangles
            .push([tri[0] as u32, tri[1] as u32, tri[2] as u32]);
    }

    for p in pos {
        shp.pos.push(*p);
        shp.radius.push(1.0);
    }

    shp.norm.extend_from_slice(norm);

    for pair in uv.chunks(2) {
        shp.texcoord.push(Point2f::new(pair[0], pair[1]));
    }
}
