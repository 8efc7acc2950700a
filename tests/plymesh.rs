mod plymesh {
    use pbrt_scene::core::shape::Shape;
    use pbrt_scene::pbrtparser::parser::parse_scene;
    use pbrt_scene::shapes::plymesh::load_plymesh;
    use std::fs;

    const ASCII_PLY: &str = "\
ply
format ascii 1.0
comment made by hand
element vertex 3
property float x
property float y
property float z
property float nx
property float ny
property float nz
element face 1
property list uchar int vertex_indices
end_header
0 0 0 0 0 1
1 0 0 0 0 1
0 1 0 0 0 1
3 0 1 2
";

    fn binary_ply() -> Vec<u8> {
        let header = "\
ply
format binary_little_endian 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uint8 int vertex_indices
end_header
";

        let mut data = header.as_bytes().to_vec();
        let vertices: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        for v in vertices.iter() {
            data.extend_from_slice(&v.to_le_bytes());
        }

        data.push(3u8);
        for i in [0i32, 1, 2] {
            data.extend_from_slice(&i.to_le_bytes());
        }

        data
    }

    #[test]
    fn ascii_mesh_fills_vertex_and_face_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.ply");
        fs::write(&path, ASCII_PLY).unwrap();

        let mut shp = Shape::default();
        load_plymesh(&path, &mut shp).unwrap();

        assert_eq!(shp.pos.len(), 3);
        assert_eq!(shp.norm.len(), 3);
        assert!(shp.texcoord.is_empty());
        assert_eq!(shp.triangles, vec![[0, 1, 2]]);
        assert!((shp.pos[1].x - 1.0).abs() < 1e-6);
        assert!((shp.norm[0].z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn binary_mesh_reads_little_endian() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.ply");
        fs::write(&path, binary_ply()).unwrap();

        let mut shp = Shape::default();
        load_plymesh(&path, &mut shp).unwrap();

        assert_eq!(shp.pos.len(), 3);
        assert_eq!(shp.triangles, vec![[0, 1, 2]]);
        assert!((shp.pos[2].y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn non_triangular_faces_are_rejected() {
        let quad = ASCII_PLY.replace("3 0 1 2", "4 0 1 2 2");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.ply");
        fs::write(&path, quad).unwrap();

        let mut shp = Shape::default();
        let err = load_plymesh(&path, &mut shp).unwrap_err();
        assert!(err.to_string().contains("three vertices"));
    }

    #[test]
    fn non_float_vertex_properties_are_rejected() {
        let bad = ASCII_PLY.replace("property float x", "property double x");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ply");
        fs::write(&path, bad).unwrap();

        let mut shp = Shape::default();
        let err = load_plymesh(&path, &mut shp).unwrap_err();
        assert!(err.to_string().contains("double"));
    }

    #[test]
    fn unknown_vertex_properties_are_rejected() {
        let bad = ASCII_PLY.replace("property float nx", "property float red");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ply");
        fs::write(&path, bad).unwrap();

        let mut shp = Shape::default();
        let err = load_plymesh(&path, &mut shp).unwrap_err();
        assert!(err.to_string().contains("red"));
    }

    #[test]
    fn plymesh_shapes_resolve_relative_to_the_scene_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tri.ply"), ASCII_PLY).unwrap();
        fs::write(
            dir.path().join("scene.pbrt"),
            "WorldBegin\nShape \"plymesh\" \"string filename\" \"tri.ply\"\nWorldEnd\n",
        )
        .unwrap();

        let scene = parse_scene(dir.path().join("scene.pbrt")).unwrap();
        assert_eq!(scene.shapes.len(), 1);
        assert_eq!(scene.shapes[0].shapes[0].pos.len(), 3);
    }

    #[test]
    fn missing_mesh_is_a_syntax_error_with_the_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("scene.pbrt"),
            "WorldBegin\nShape \"plymesh\" \"string filename\" \"gone.ply\"\nWorldEnd\n",
        )
        .unwrap();

        match parse_scene(dir.path().join("scene.pbrt")) {
            Err(pbrt_scene::PbrtError::Syntax { msg, .. }) => {
                assert!(msg.contains("gone.ply"), "message was: {}", msg)
            }
            other => panic!("expected syntax error, got {:?}", other.map(|_| "scene")),
        }
    }
}
