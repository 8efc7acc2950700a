mod params {
    use pbrt_scene::core::error::PbrtError;
    use pbrt_scene::core::scene::Scene;
    use pbrt_scene::pbrtparser::parser::PBRTParser;

    fn parse(text: &str) -> Result<Scene, PbrtError> {
        PBRTParser::from_source(text, ".").parse()
    }

    fn expect_syntax_error(text: &str) -> String {
        match parse(text) {
            Err(PbrtError::Syntax { msg, .. }) => msg,
            other => panic!("expected syntax error, got {:?}", other.map(|_| "scene")),
        }
    }

    #[test]
    fn kind_outside_registry_set_is_rejected() {
        let msg = expect_syntax_error(
            "WorldBegin\nShape \"trianglemesh\" \"float P\" [0 0 0] \"integer indices\" [0 1 2]\nWorldEnd\n",
        );

        assert!(msg.contains("\"P\""), "message was: {}", msg);
        assert!(msg.contains("point3"), "message was: {}", msg);
    }

    #[test]
    fn unknown_type_word_is_rejected() {
        let msg = expect_syntax_error("WorldBegin\nMaterial \"matte\" \"quaternion Kd\" [1 2 3 4]\nWorldEnd\n");
        assert!(msg.contains("Unrecognized type"), "message was: {}", msg);
    }

    #[test]
    fn empty_array_is_rejected() {
        let msg = expect_syntax_error(
            "WorldBegin\nShape \"trianglemesh\" \"integer indices\" []\nWorldEnd\n",
        );
        assert!(msg.contains("empty"), "message was: {}", msg);
    }

    #[test]
    fn unclosed_array_is_rejected() {
        let msg = expect_syntax_error(
            "WorldBegin\nMaterial \"matte\" \"rgb Kd\" [0.5 0.5 0.5\nWorldEnd\n",
        );
        assert!(msg.contains("']'"), "message was: {}", msg);
    }

    #[test]
    fn compound_arrays_must_be_triples() {
        let msg = expect_syntax_error(
            "WorldBegin\nMaterial \"matte\" \"rgb Kd\" [0.5 0.5]\nWorldEnd\n",
        );
        assert!(msg.contains("Wrong number"), "message was: {}", msg);
    }

    #[test]
    fn bool_values_are_validated() {
        let msg = expect_syntax_error(
            "WorldBegin\nAreaLightSource \"diffuse\" \"bool twosided\" \"maybe\"\nWorldEnd\n",
        );
        assert!(msg.contains("boolean"), "message was: {}", msg);
    }

    #[test]
    fn point_aliases_normalize() {
        // "point P" must be accepted exactly like "point3 P"
        let scene = parse(
            "WorldBegin\nShape \"trianglemesh\" \"integer indices\" [0 1 2] \"point P\" [0 0 0 1 0 0 0 1 0]\nWorldEnd\n",
        )
        .unwrap();

        assert_eq!(scene.shapes[0].shapes[0].pos.len(), 3);
    }

    #[test]
    fn color_is_an_alias_for_rgb() {
        let scene = parse(
            "WorldBegin\nMaterial \"matte\" \"color Kd\" [0.9 0.1 0.2]\nShape \"cube\"\nWorldEnd\n",
        )
        .unwrap();

        let mat = scene.shapes[0].shapes[0].material.as_ref().unwrap();
        assert!((mat.kd.x - 0.9).abs() < 1e-6);
    }

    #[test]
    fn blackbody_converts_to_rgb() {
        let scene = parse(
            "WorldBegin\nMaterial \"matte\" \"blackbody Kd\" [3000 1]\nShape \"cube\"\nWorldEnd\n",
        )
        .unwrap();

        let mat = scene.shapes[0].shapes[0].material.as_ref().unwrap();
        // a 3000K emitter is reddish
        assert!(mat.kd.x > 0.0);
        assert!(mat.kd.x > mat.kd.z);
    }

    #[test]
    fn inline_spectrum_converts_to_rgb() {
        let scene = parse(
            "WorldBegin\nMaterial \"matte\" \"spectrum Kd\" [400 1 500 1 600 1 700 1]\nShape \"cube\"\nWorldEnd\n",
        )
        .unwrap();

        let mat = scene.shapes[0].shapes[0].material.as_ref().unwrap();
        assert!(mat.kd.x > 0.0 && mat.kd.y > 0.0 && mat.kd.z > 0.0);
    }

    #[test]
    fn odd_spectrum_sample_count_is_rejected() {
        let msg = expect_syntax_error(
            "WorldBegin\nMaterial \"matte\" \"spectrum Kd\" [400 1 500]\nWorldEnd\n",
        );
        assert!(msg.contains("even number"), "message was: {}", msg);
    }

    #[test]
    fn integer_literals_truncate_through_float() {
        let scene = parse(
            "WorldBegin\nShape \"trianglemesh\" \"integer indices\" [0 1 2.9] \"point P\" [0 0 0 1 0 0 0 1 0]\nWorldEnd\n",
        )
        .unwrap();

        assert_eq!(scene.shapes[0].shapes[0].triangles[0], [0, 1, 2]);
    }
}
