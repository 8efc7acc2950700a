mod scenes {
    use pbrt_scene::core::error::PbrtError;
    use pbrt_scene::core::pbrt::Float;
    use pbrt_scene::core::scene::Scene;
    use pbrt_scene::core::transform::matrix_origin;
    use pbrt_scene::parse_scene;
    use pbrt_scene::pbrtparser::parser::PBRTParser;
    use std::fs;

    fn parse(text: &str) -> Result<Scene, PbrtError> {
        PBRTParser::from_source(text, ".").parse()
    }

    fn assert_close(a: Float, b: Float) {
        assert!((a - b).abs() < 1e-4, "{} != {}", a, b);
    }

    #[test]
    fn lookat_camera_frame_and_focus() {
        let scene = parse(
            "LookAt 0 0 5  0 0 0  0 1 0\nCamera \"perspective\"\nWorldBegin\nWorldEnd\n",
        )
        .unwrap();

        assert_eq!(scene.cameras.len(), 1);
        let cam = &scene.cameras[0];
        let origin = matrix_origin(&cam.frame);

        assert_close(origin.x, 0.0);
        assert_close(origin.y, 0.0);
        assert_close(origin.z, 5.0);
        assert_close(cam.focus, 5.0);
    }

    #[test]
    fn preworld_translates_compose_into_instance_frame() {
        let scene = parse(
            "Translate 1 0 0\nTranslate 0 2 0\nWorldBegin\nAttributeBegin\n\
             Shape \"trianglemesh\" \"integer indices\" [0 1 2] \"point P\" [0 0 0 1 0 0 0 1 0]\n\
             AttributeEnd\nWorldEnd\n",
        )
        .unwrap();

        assert_eq!(scene.shapes.len(), 1);
        assert_eq!(scene.instances.len(), 1);

        let shp = &scene.shapes[0].shapes[0];
        assert_eq!(shp.triangles, vec![[0, 1, 2]]);
        assert_close(shp.pos[1].x, 1.0);
        assert_close(shp.pos[2].y, 1.0);

        let origin = matrix_origin(&scene.instances[0].frame);
        assert_close(origin.x, 1.0);
        assert_close(origin.y, 2.0);
        assert_close(origin.z, 0.0);
    }

    #[test]
    fn include_resolves_relative_to_including_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.pbrt"), "Include \"B.pbrt\"\n").unwrap();
        fs::write(dir.path().join("B.pbrt"), "WorldBegin\nWorldEnd\n").unwrap();

        parse_scene(dir.path().join("A.pbrt")).unwrap();
    }

    #[test]
    fn missing_include_carries_the_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.pbrt"), "Include \"missing.pbrt\"\n").unwrap();

        match parse_scene(dir.path().join("A.pbrt")) {
            Err(PbrtError::Io { file, .. }) => {
                assert!(file.to_string_lossy().contains("missing.pbrt"))
            }
            other => panic!("expected io error, got {:?}", other.map(|_| "scene")),
        }
    }

    #[test]
    fn named_material_reuse() {
        let scene = parse(
            "WorldBegin\n\
             MakeNamedMaterial \"red\" \"string type\" \"matte\" \"rgb Kd\" [0.8 0.1 0.1]\n\
             NamedMaterial \"red\"\n\
             Shape \"trianglemesh\" \"integer indices\" [0 1 2] \"point P\" [0 0 0 1 0 0 0 1 0]\n\
             WorldEnd\n",
        )
        .unwrap();

        let mat = scene.shapes[0].shapes[0].material.as_ref().unwrap();
        assert_close(mat.kd.x, 0.8);
        assert_close(mat.kd.y, 0.1);
        assert_close(mat.kd.z, 0.1);

        // committed to the scene exactly once
        assert_eq!(scene.materials.len(), 1);
        assert_close(scene.materials[0].kd.x, 0.8);
    }

    #[test]
    fn unreferenced_named_material_stays_out_of_the_scene() {
        let scene = parse(
            "WorldBegin\n\
             MakeNamedMaterial \"red\" \"string type\" \"matte\" \"rgb Kd\" [0.8 0.1 0.1]\n\
             WorldEnd\n",
        )
        .unwrap();

        assert!(scene.materials.is_empty());
    }

    #[test]
    fn object_instances_share_one_shape_group() {
        let scene = parse(
            "WorldBegin\n\
             ObjectBegin \"cube1\"\nShape \"cube\"\nObjectEnd\n\
             ObjectInstance \"cube1\"\n\
             Translate 3 0 0\n\
             ObjectInstance \"cube1\"\n\
             WorldEnd\n",
        )
        .unwrap();

        // the group joins the scene once, instantiated twice
        assert_eq!(scene.shapes.len(), 1);
        assert_eq!(scene.instances.len(), 2);

        let o0 = matrix_origin(&scene.instances[0].frame);
        let o1 = matrix_origin(&scene.instances[1].frame);
        assert_close(o0.x, 0.0);
        assert_close(o1.x, 3.0);

        assert!(std::sync::Arc::ptr_eq(
            &scene.instances[0].shape_group,
            &scene.instances[1].shape_group
        ));
    }

    #[test]
    fn nested_object_definitions_are_rejected() {
        match parse("WorldBegin\nObjectBegin \"a\"\nObjectBegin \"b\"\nObjectEnd\nObjectEnd\nWorldEnd\n") {
            Err(PbrtError::Syntax { msg, .. }) => assert!(msg.contains("inside another object")),
            other => panic!("expected syntax error, got {:?}", other.map(|_| "scene")),
        }
    }

    #[test]
    fn instancing_an_unknown_object_is_rejected() {
        match parse("WorldBegin\nObjectInstance \"ghost\"\nWorldEnd\n") {
            Err(PbrtError::Syntax { msg, .. }) => assert!(msg.contains("not found")),
            other => panic!("expected syntax error, got {:?}", other.map(|_| "scene")),
        }
    }

    #[test]
    fn unknown_directives_warn_and_skip() {
        let scene = parse("WorldBegin\nFooBar 1 2 3\nShape \"cube\"\nWorldEnd\n").unwrap();

        assert_eq!(scene.shapes.len(), 1);
        assert_eq!(scene.shapes[0].shapes[0].triangles.len(), 12);
    }

    #[test]
    fn unmatched_attribute_end_is_rejected() {
        match parse("WorldBegin\nAttributeEnd\nWorldEnd\n") {
            Err(PbrtError::Syntax { msg, .. }) => assert!(msg.contains("unmatched")),
            other => panic!("expected syntax error, got {:?}", other.map(|_| "scene")),
        }
    }

    #[test]
    fn unmatched_transform_end_is_rejected() {
        match parse("WorldBegin\nTransformEnd\nWorldEnd\n") {
            Err(PbrtError::Syntax { msg, .. }) => assert!(msg.contains("unmatched")),
            other => panic!("expected syntax error, got {:?}", other.map(|_| "scene")),
        }
    }

    #[test]
    fn attribute_blocks_restore_material_state() {
        let scene = parse(
            "WorldBegin\n\
             AttributeBegin\nMaterial \"matte\" \"rgb Kd\" [1 0 0]\nAttributeEnd\n\
             Shape \"cube\"\n\
             WorldEnd\n",
        )
        .unwrap();

        // the material from inside the block is gone; the shape gets a
        // fresh empty one
        let mat = scene.shapes[0].shapes[0].material.as_ref().unwrap();
        assert_close(mat.kd.x, 0.0);
    }

    #[test]
    fn transform_takes_exactly_sixteen_floats() {
        match parse("Transform [1 0 0 0  0 1 0 0  0 0 1 0  0 0 0]\nWorldBegin\nWorldEnd\n") {
            Err(PbrtError::Syntax { msg, .. }) => assert!(msg.contains("4x4")),
            other => panic!("expected syntax error, got {:?}", other.map(|_| "scene")),
        }
    }

    #[test]
    fn film_resolution_sets_camera_aspect() {
        let scene = parse(
            "Camera \"perspective\" \"float fov\" [60]\n\
             Film \"image\" \"integer xresolution\" [1024] \"integer yresolution\" [512]\n\
             WorldBegin\nWorldEnd\n",
        )
        .unwrap();

        let cam = &scene.cameras[0];
        assert_close(cam.aspect, 2.0);
        assert_close(cam.yfov, 60.0_f32.to_radians());
    }

    #[test]
    fn area_light_state_applies_to_shapes_and_resets_on_pop() {
        let scene = parse(
            "WorldBegin\n\
             AttributeBegin\n\
             AreaLightSource \"diffuse\" \"rgb L\" [2 2 2] \"bool twosided\" \"true\"\n\
             Shape \"cube\"\n\
             AttributeEnd\n\
             Shape \"cube\"\n\
             WorldEnd\n",
        )
        .unwrap();

        let lit = scene.shapes[0].shapes[0].material.as_ref().unwrap();
        assert_close(lit.ke.x, 2.0);
        assert!(lit.double_sided);

        let unlit = scene.shapes[1].shapes[0].material.as_ref().unwrap();
        assert_close(unlit.ke.x, 0.0);
        assert!(!unlit.double_sided);
    }

    #[test]
    fn point_light_builds_an_emissive_point_shape() {
        let scene = parse(
            "WorldBegin\n\
             LightSource \"point\" \"rgb I\" [4 4 4] \"rgb scale\" [0.5 0.5 0.5] \"point from\" [1 2 3]\n\
             WorldEnd\n",
        )
        .unwrap();

        assert_eq!(scene.shapes.len(), 1);
        let shp = &scene.shapes[0].shapes[0];
        assert_eq!(shp.points, vec![0]);
        assert_close(shp.pos[0].z, 3.0);

        let mat = shp.material.as_ref().unwrap();
        assert_close(mat.ke.x, 2.0);
    }

    #[test]
    fn infinite_and_distant_lights_create_environments() {
        let scene = parse(
            "WorldBegin\n\
             LightSource \"infinite\" \"rgb L\" [1 1 1] \"rgb scale\" [2 2 2]\n\
             LightSource \"distant\" \"rgb L\" [3 3 3]\n\
             WorldEnd\n",
        )
        .unwrap();

        assert_eq!(scene.environments.len(), 2);
        assert_close(scene.environments[0].ke.x, 2.0);
        assert_close(scene.environments[1].ke.x, 3.0);
    }

    #[test]
    fn curve_shapes_are_parsed_and_skipped() {
        let scene = parse(
            "WorldBegin\n\
             Shape \"curve\" \"point p\" [0 0 0 1 0 0 1 1 0 1 1 1] \"integer degree\" [3]\n\
             Shape \"cube\"\n\
             WorldEnd\n",
        )
        .unwrap();

        assert_eq!(scene.shapes.len(), 1);
    }

    #[test]
    fn identifiers_are_unique_per_kind() {
        let scene = parse(
            "WorldBegin\n\
             Shape \"cube\"\nShape \"cube\"\nShape \"cube\"\n\
             LightSource \"point\"\n\
             WorldEnd\n",
        )
        .unwrap();

        let mut group_names: Vec<_> = scene.shapes.iter().map(|g| g.name.clone()).collect();
        group_names.sort();
        group_names.dedup();
        assert_eq!(group_names.len(), scene.shapes.len());

        let mut instance_names: Vec<_> =
            scene.instances.iter().map(|i| i.name.clone()).collect();
        instance_names.sort();
        instance_names.dedup();
        assert_eq!(instance_names.len(), scene.instances.len());

        let mut material_names: Vec<_> =
            scene.materials.iter().map(|m| m.name.clone()).collect();
        material_names.sort();
        material_names.dedup();
        assert_eq!(material_names.len(), scene.materials.len());
    }

    #[test]
    fn input_ending_inside_a_construct_is_a_syntax_error() {
        match parse("WorldBegin\nShape \"trianglemesh\" \"integer indices\" [0 1 2]") {
            Err(PbrtError::Syntax { msg, .. }) => assert!(msg.contains("input ended")),
            other => panic!("expected syntax error, got {:?}", other.map(|_| "scene")),
        }
    }

    #[test]
    fn world_requires_an_end_marker() {
        match parse("WorldBegin\n") {
            Err(PbrtError::Syntax { .. }) => {}
            other => panic!("expected syntax error, got {:?}", other.map(|_| "scene")),
        }
    }
}
