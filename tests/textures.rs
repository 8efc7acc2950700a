mod textures {
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
    fn referenced_textures_commit_once_unreferenced_never() {
        let scene = parse(
            "WorldBegin\n\
             Texture \"warm\" \"rgb\" \"constant\" \"rgb value\" [1 0.5 0]\n\
             Texture \"unused\" \"rgb\" \"constant\" \"rgb value\" [0 1 0]\n\
             Material \"matte\" \"texture Kd\" \"warm\"\n\
             Material \"plastic\" \"texture Kd\" \"warm\"\n\
             WorldEnd\n",
        )
        .unwrap();

        assert_eq!(scene.textures.len(), 1);
        let px = scene.textures[0].texel(0, 0);
        assert!((px[0] - 1.0).abs() < 0.01);
        assert!((px[1] - 0.5).abs() < 0.01);
    }

    #[test]
    fn texture_name_collisions_are_rejected() {
        let msg = expect_syntax_error(
            "WorldBegin\n\
             Texture \"t\" \"rgb\" \"constant\" \"rgb value\" [1 1 1]\n\
             Texture \"t\" \"rgb\" \"constant\" \"rgb value\" [0 0 0]\n\
             WorldEnd\n",
        );
        assert!(msg.contains("already used"), "message was: {}", msg);
    }

    #[test]
    fn unsupported_pixel_types_are_rejected() {
        let msg = expect_syntax_error(
            "WorldBegin\nTexture \"t\" \"vector\" \"constant\"\nWorldEnd\n",
        );
        assert!(msg.contains("base type"), "message was: {}", msg);
    }

    #[test]
    fn unsupported_texture_classes_are_rejected() {
        let msg = expect_syntax_error(
            "WorldBegin\nTexture \"t\" \"rgb\" \"marble\"\nWorldEnd\n",
        );
        assert!(msg.contains("marble"), "message was: {}", msg);
    }

    #[test]
    fn missing_texture_references_are_rejected() {
        let msg = expect_syntax_error(
            "WorldBegin\nMaterial \"matte\" \"texture Kd\" \"ghost\"\nWorldEnd\n",
        );
        assert!(msg.contains("not found"), "message was: {}", msg);
    }

    #[test]
    fn checkerboard_tiles_64_pixels() {
        let scene = parse(
            "WorldBegin\n\
             Texture \"check\" \"rgb\" \"checkerboard\" \"rgb tex1\" [0 0 0] \"rgb tex2\" [1 1 1]\n\
             Material \"matte\" \"texture Kd\" \"check\"\n\
             WorldEnd\n",
        )
        .unwrap();

        let txt = &scene.textures[0];
        assert_eq!(txt.width(), 128);
        assert_eq!(txt.height(), 128);

        // tex1 in the first tile, tex2 across the 64-pixel boundary
        assert!(txt.texel(0, 0)[0] < 0.01);
        assert!(txt.texel(64, 0)[0] > 0.99);
        assert!(txt.texel(0, 64)[0] > 0.99);
        assert!(txt.texel(64, 64)[0] < 0.01);
    }

    #[test]
    fn scale_texture_multiplies_pixelwise() {
        let scene = parse(
            "WorldBegin\n\
             Texture \"half\" \"rgb\" \"constant\" \"rgb value\" [0.5 0.5 0.5]\n\
             Texture \"combined\" \"rgb\" \"scale\" \"texture tex1\" \"half\" \"rgb tex2\" [1 0.5 0]\n\
             Material \"matte\" \"texture Kd\" \"combined\"\n\
             WorldEnd\n",
        )
        .unwrap();

        // only the scale result is referenced; its operand stays out
        assert_eq!(scene.textures.len(), 1);
        let px = scene.textures[0].texel(0, 0);
        assert!((px[0] - 0.5).abs() < 0.01);
        assert!((px[1] - 0.25).abs() < 0.01);
        assert!(px[2] < 0.01);
    }

    #[test]
    fn uv_scale_from_texture_applies_to_shape_texcoords() {
        // checkerboard carries uscale/vscale through to shape texcoords
        let scene = parse(
            "WorldBegin\n\
             Texture \"check\" \"rgb\" \"checkerboard\" \"float uscale\" [2] \"float vscale\" [4]\n\
             Material \"matte\" \"texture Kd\" \"check\"\n\
             Shape \"trianglemesh\" \"integer indices\" [0 1 2] \"point P\" [0 0 0 1 0 0 0 1 0] \"float uv\" [0 0 1 0 1 1]\n\
             WorldEnd\n",
        )
        .unwrap();

        let shp = &scene.shapes[0].shapes[0];
        assert!((shp.texcoord[1].x - 2.0).abs() < 1e-6);
        assert!((shp.texcoord[2].y - 4.0).abs() < 1e-6);
    }

    #[test]
    fn mix_materials_blend_fields_and_textures() {
        let scene = parse(
            "WorldBegin\n\
             Texture \"dark\" \"rgb\" \"constant\" \"rgb value\" [0 0 0]\n\
             Texture \"light\" \"rgb\" \"constant\" \"rgb value\" [1 1 1]\n\
             MakeNamedMaterial \"a\" \"string type\" \"matte\" \"rgb Kd\" [1 0 0] \"texture bumpmap\" \"dark\"\n\
             MakeNamedMaterial \"b\" \"string type\" \"matte\" \"rgb Kd\" [0 1 0] \"texture bumpmap\" \"light\"\n\
             Material \"mix\" \"string namedmaterial1\" \"a\" \"string namedmaterial2\" \"b\" \"float amount\" [0.25]\n\
             Shape \"cube\"\n\
             WorldEnd\n",
        )
        .unwrap();

        let mat = scene.shapes[0].shapes[0].material.as_ref().unwrap();
        assert!((mat.kd.x - 0.25).abs() < 1e-4);
        assert!((mat.kd.y - 0.75).abs() < 1e-4);

        // the blended bump image: 0 * 0.25 + 1 * 0.75
        let bump = mat.bump_txt.as_ref().unwrap();
        assert!((bump.texel(0, 0)[0] - 0.75).abs() < 0.01);
    }

    #[test]
    fn mix_requires_both_named_materials() {
        let msg = expect_syntax_error(
            "WorldBegin\nMaterial \"mix\" \"string namedmaterial1\" \"a\"\nWorldEnd\n",
        );
        assert!(msg.contains("material2"), "message was: {}", msg);
    }

    #[test]
    fn redeclaring_a_named_material_is_rejected() {
        let msg = expect_syntax_error(
            "WorldBegin\n\
             MakeNamedMaterial \"m\" \"string type\" \"matte\"\n\
             MakeNamedMaterial \"m\" \"string type\" \"matte\"\n\
             WorldEnd\n",
        );
        assert!(msg.contains("already exists"), "message was: {}", msg);
    }

    #[test]
    fn unknown_named_material_lookup_is_rejected() {
        let msg = expect_syntax_error("WorldBegin\nNamedMaterial \"ghost\"\nWorldEnd\n");
        assert!(msg.contains("name"), "message was: {}", msg);
    }
}
