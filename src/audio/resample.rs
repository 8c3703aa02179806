//! Linear resampling between capture and analysis sample rates.

use anyhow::{ensure, Result};

/// Linearly resample `samples` from `source_rate` to `target_rate`.
///
/// Each output sample interpolates between its two nearest source neighbors;
/// positions past the final source sample hold its value.
pub fn linear_resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    ensure!(source_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }
    let step = source_rate as f32 / target_rate as f32;
    let output_len = ((samples.len() as f32 / step).ceil() as usize).max(1);
    let last = samples.len() - 1;
    let resampled = (0..output_len)
        .map(|i| {
            let position = i as f32 * step;
            let left = (position as usize).min(last);
            let right = (left + 1).min(last);
            let weight = position - left as f32;
            samples[left] + (samples[right] - samples[left]) * weight
        })
        .collect();
    Ok(resampled)
}
