//! Tensor diagnostics
//!
//! Both helpers copy the tensor back to the host, so callers gate them behind
//! `tracing::enabled!` rather than running them every step.

use burn::prelude::*;

fn host_values<B: Backend, const D: usize>(tensor: &Tensor<B, D>) -> Option<Vec<f32>> {
    tensor.clone().into_data().convert::<f32>().to_vec().ok()
}

/// Summarize a tensor as `min, max, mean, std` with NaN/Inf counts
pub fn tensor_stats<B: Backend, const D: usize>(tensor: &Tensor<B, D>) -> String {
    let Some(floats) = host_values(tensor) else {
        return "unreadable".to_string();
    };

    if floats.is_empty() {
        return "empty".to_string();
    }

    let nan_count = floats.iter().filter(|x| x.is_nan()).count();
    let inf_count = floats.iter().filter(|x| x.is_infinite()).count();
    let min = floats.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = floats.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mean = floats.iter().sum::<f32>() / floats.len() as f32;
    let var = floats.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / floats.len() as f32;
    let std = var.sqrt();

    if nan_count > 0 || inf_count > 0 {
        format!(
            "min={:.4}, max={:.4}, mean={:.4}, std={:.4} [NaN={}, Inf={}]",
            min, max, mean, std, nan_count, inf_count
        )
    } else {
        format!("min={:.4}, max={:.4}, mean={:.4}, std={:.4}", min, max, mean, std)
    }
}

/// Whether a tensor holds any NaN or infinite value
pub fn has_non_finite<B: Backend, const D: usize>(tensor: &Tensor<B, D>) -> bool {
    host_values(tensor).is_some_and(|floats| floats.iter().any(|x| !x.is_finite()))
}
