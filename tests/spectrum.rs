mod spectrum {
    use pbrt_scene::core::spectrum::{blackbody_to_rgb, spectrum_to_rgb};

    #[test]
    fn flat_spectrum_is_roughly_neutral() {
        let samples: Vec<(f32, f32)> = (0..40).map(|i| (380.0 + i as f32 * 10.0, 1.0)).collect();
        let rgb = spectrum_to_rgb(&samples);

        assert!(rgb.x > 0.0 && rgb.y > 0.0 && rgb.z > 0.0);
        // no channel dominates by an order of magnitude
        let max = rgb.x.max(rgb.y).max(rgb.z);
        let min = rgb.x.min(rgb.y).min(rgb.z);
        assert!(max / min < 3.0, "rgb was {:?}", rgb);
    }

    #[test]
    fn narrow_red_band_maps_to_red() {
        let rgb = spectrum_to_rgb(&[(620.0, 1.0), (680.0, 1.0)]);
        assert!(rgb.x > rgb.y);
        assert!(rgb.x > rgb.z);
    }

    #[test]
    fn sample_order_does_not_matter() {
        let a = spectrum_to_rgb(&[(400.0, 0.2), (550.0, 1.0), (700.0, 0.4)]);
        let b = spectrum_to_rgb(&[(700.0, 0.4), (400.0, 0.2), (550.0, 1.0)]);

        assert!((a.x - b.x).abs() < 1e-6);
        assert!((a.y - b.y).abs() < 1e-6);
        assert!((a.z - b.z).abs() < 1e-6);
    }

    #[test]
    fn cool_blackbodies_are_red_hot_ones_blue() {
        let warm = blackbody_to_rgb(2500.0, 1.0);
        let hot = blackbody_to_rgb(12000.0, 1.0);

        assert!(warm.x > warm.z);
        assert!(hot.z / hot.x > warm.z / warm.x);
    }

    #[test]
    fn blackbody_scale_is_linear() {
        let one = blackbody_to_rgb(5000.0, 1.0);
        let two = blackbody_to_rgb(5000.0, 2.0);

        assert!((two.x - 2.0 * one.x).abs() < 1e-4);
        assert!((two.y - 2.0 * one.y).abs() < 1e-4);
    }
}
