//! Heart-rate dispersion.

use crate::sleep::HeartRateSample;

/// Population standard deviation of the samples' bpm.
///
/// Non-finite readings are ignored. Fewer than two usable samples yield 0.0.
#[allow(clippy::cast_precision_loss)]
pub fn heart_rate_variability<'a, I>(samples: I) -> f64
where
    I: IntoIterator<Item = &'a HeartRateSample>,
{
    let bpm: Vec<f64> = samples
        .into_iter()
        .map(|s| s.bpm)
        .filter(|bpm| bpm.is_finite())
        .collect();
    if bpm.len() < 2 {
        return 0.0;
    }

    let n = bpm.len() as f64;
    let mean = bpm.iter().sum::<f64>() / n;
    let variance = bpm.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
