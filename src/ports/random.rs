//! Random source abstraction (0-1 floats).
#[async_trait::async_trait]
pub trait RandomSource: Send + Sync {
    async fn next_f64(&self) -> f64; // expected in [0,1)
}

/// Maps a draw in `[0,1)` onto `0..len`. Out-of-range draws are clamped.
pub fn index_for(draw: f64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let draw = if draw.is_finite() { draw.max(0.0) } else { 0.0 };
    let idx = (draw * len as f64) as usize;
    Some(idx.min(len - 1))
}
