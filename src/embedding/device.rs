use candle_core::Device;
use tracing::{debug, warn};

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

use super::error::EmbeddingError;

/// Picks the cross-encoder compute device.
///
/// Tries Metal, then CUDA, when those features are compiled in. Always ends on
/// the CPU rather than failing, so model loading only errors on missing files.
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!("Cross-encoder using Metal");
            return Ok(device);
        }
        Err(e) => failures.push(format!("metal: {e}")),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!("Cross-encoder using CUDA");
            return Ok(device);
        }
        Err(e) => failures.push(format!("cuda: {e}")),
    }

    if failures.is_empty() {
        debug!("No GPU backend compiled, using CPU");
    } else {
        warn!(failures = %failures.join("; "), "GPU unavailable, using CPU");
    }

    Ok(Device::Cpu)
}
