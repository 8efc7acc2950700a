use crate::core::geometry::vector::Vector3f;
use crate::core::pbrt::Float;

/// Spectrum-to-rgb color science, consumed by the parameter engine as pure
/// functions. Sampled spectral power distributions are integrated against
/// the CIE 1931 color matching functions (the multi-lobe Gaussian fit of
/// Wyman et al.) on a fixed wavelength grid, then mapped to linear sRGB.

const LAMBDA_START: Float = 360.0;
const LAMBDA_END: Float = 830.0;
const LAMBDA_STEP: Float = 5.0;

fn gauss(x: Float, alpha: Float, mu: Float, sigma1: Float, sigma2: Float) -> Float {
    let sigma = if x < mu { sigma1 } else { sigma2 };
    let t = (x - mu) / sigma;
    alpha * (-0.5 * t * t).exp()
}

fn cie_x(lambda: Float) -> Float {
    gauss(lambda, 1.056, 599.8, 37.9, 31.0)
        + gauss(lambda, 0.362, 442.0, 16.0, 26.7)
        + gauss(lambda, -0.065, 501.1, 20.4, 26.2)
}

fn cie_y(lambda: Float) -> Float {
    gauss(lambda, 0.821, 568.8, 46.9, 40.5) + gauss(lambda, 0.286, 530.9, 16.3, 31.1)
}

fn cie_z(lambda: Float) -> Float {
    gauss(lambda, 1.217, 437.0, 11.8, 36.0) + gauss(lambda, 0.681, 459.0, 26.0, 13.8)
}

/// Linear interpolation of an SPD given as (wavelength, value) samples.
/// Wavelengths outside the sampled range clamp to the nearest sample.
fn interpolate_spd(samples: &[(Float, Float)], lambda: Float) -> Float {
    match samples {
        [] => 0.0,
        [only] => only.1,
        _ => {
            if lambda <= samples[0].0 {
                return samples[0].1;
            }
            if lambda >= samples[samples.len() - 1].0 {
                return samples[samples.len() - 1].1;
            }

            let i = samples.partition_point(|s| s.0 < lambda);
            let (l0, v0) = samples[i - 1];
            let (l1, v1) = samples[i];
            let t = (lambda - l0) / (l1 - l0);
            (1.0 - t) * v0 + t * v1
        }
    }
}

fn xyz_to_rgb(xyz: [Float; 3]) -> Vector3f {
    let r = 3.240479 * xyz[0] - 1.537150 * xyz[1] - 0.498535 * xyz[2];
    let g = -0.969256 * xyz[0] + 1.875991 * xyz[1] + 0.041556 * xyz[2];
    let b = 0.055648 * xyz[0] - 0.204043 * xyz[1] + 1.057311 * xyz[2];

    Vector3f::new(r.max(0.0), g.max(0.0), b.max(0.0))
}

/// Convert a sampled spectrum to an rgb triple. Samples are sorted by
/// wavelength before integration.
pub fn spectrum_to_rgb(samples: &[(Float, Float)]) -> Vector3f {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut xyz = [0.0; 3];
    let mut y_integral = 0.0;
    let mut lambda = LAMBDA_START;

    while lambda <= LAMBDA_END {
        let v = interpolate_spd(&sorted, lambda);
        xyz[0] += v * cie_x(lambda);
        xyz[1] += v * cie_y(lambda);
        xyz[2] += v * cie_z(lambda);
        y_integral += cie_y(lambda);
        lambda += LAMBDA_STEP;
    }

    for c in xyz.iter_mut() {
        *c /= y_integral;
    }

    xyz_to_rgb(xyz)
}

/// Planck's law, wavelength in nanometers, radiance in arbitrary units.
fn blackbody(lambda_nm: Float, t: Float) -> Float {
    const H: f64 = 6.62606957e-34;
    const C: f64 = 299792458.0;
    const KB: f64 = 1.3806488e-23;

    let l = lambda_nm as f64 * 1e-9;
    let le = (2.0 * H * C * C) / (l.powi(5) * (((H * C) / (l * KB * t as f64)).exp() - 1.0));

    le as Float
}

/// Convert a blackbody emitter at the given temperature (Kelvin) to an rgb
/// triple. The emission curve is normalized so its peak is 1 (Wien's
/// displacement law) before the scale factor is applied.
pub fn blackbody_to_rgb(temperature: Float, scale: Float) -> Vector3f {
    if temperature <= 0.0 {
        return Vector3f::default();
    }

    let lambda_max = 2.8977721e-3 / temperature as f64 * 1e9;
    let max_emission = blackbody(lambda_max as Float, temperature);

    let mut samples = Vec::new();
    let mut lambda = LAMBDA_START;
    while lambda <= LAMBDA_END {
        samples.push((lambda, blackbody(lambda, temperature) / max_emission));
        lambda += LAMBDA_STEP;
    }

    spectrum_to_rgb(&samples) * scale
}
