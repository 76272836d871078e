use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};

use fuzzy_imops::imgproc::{defocus, parallel::ExecutionStrategy};
use fuzzy_imops::tensor::Tensor2;

#[derive(FromArgs)]
/// Corrupt a quantized ramp with salt & pepper noise and defocus it
struct Args {
    /// width of the synthetic raster
    #[argh(option, default = "320")]
    width: usize,

    /// height of the synthetic raster
    #[argh(option, default = "240")]
    height: usize,

    /// number of quantization levels of the ramp
    #[argh(option, default = "16")]
    levels: u8,

    /// fraction of pixels replaced by salt or pepper
    #[argh(option, default = "0.05")]
    noise: f64,

    /// number of defocus passes
    #[argh(option, default = "1")]
    iterations: usize,

    /// worker threads, 0 uses the global rayon pool
    #[argh(option, default = "0")]
    threads: usize,

    /// seed for the noise generator
    #[argh(option, default = "42")]
    seed: u64,
}

fn mean_abs_error(a: &Tensor2<f64>, b: &Tensor2<f64>) -> f64 {
    let sum: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y).abs())
        .sum();
    sum / a.numel().max(1) as f64
}

/// Validates the `--noise` flag as a probability, clamping finite values into [0, 1].
fn noise_probability(noise: f64) -> Result<f64, String> {
    if !noise.is_finite() {
        return Err(format!("--noise must be a finite number, got {noise}"));
    }
    Ok(noise.clamp(0.0, 1.0))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let levels = args.levels.max(2) as usize;
    let step = 255 / (levels - 1);
    let width = args.width;

    // horizontal ramp quantized to `levels` values
    let clean = Tensor2::<u8>::from_shape_fn([args.height, args.width], |[_, x]| {
        let level = x * levels / width.max(1);
        (level.min(levels - 1) * step) as u8
    })?;

    let noise = noise_probability(args.noise)?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut noisy = clean.clone();
    let mut corrupted = 0usize;
    for v in noisy.as_slice_mut() {
        if rng.random_bool(noise) {
            *v = if rng.random_bool(0.5) { 255 } else { 0 };
            corrupted += 1;
        }
    }
    log::info!(
        "raster {}x{}: {} of {} pixels corrupted",
        args.height,
        args.width,
        corrupted,
        noisy.numel()
    );

    let strategy = match args.threads {
        0 => ExecutionStrategy::ParallelRows,
        n => ExecutionStrategy::Fixed(n),
    };

    let reference = clean.cast_f64()?;
    let mut restored = noisy.cast_f64()?;
    log::info!(
        "mean absolute error before: {:.4}",
        mean_abs_error(&restored, &reference)
    );

    for pass in 1..=args.iterations {
        restored = defocus::defocus_local_means_with(&restored, strategy)?;
        log::info!(
            "mean absolute error after pass {pass}: {:.4}",
            mean_abs_error(&restored, &reference)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_probability() -> Result<(), String> {
        assert_eq!(noise_probability(0.05)?, 0.05);
        assert_eq!(noise_probability(-1.0)?, 0.0);
        assert_eq!(noise_probability(3.0)?, 1.0);

        assert!(noise_probability(f64::NAN).is_err());
        assert!(noise_probability(f64::INFINITY).is_err());
        assert!(noise_probability(f64::NEG_INFINITY).is_err());
        Ok(())
    }
}
