//! Train/test split by fraction

use crate::models::Sample;
use tracing::info;

/// Split `samples` into `(train, test)`, keeping order
///
/// The train part gets the first `floor(len * train_frac)` samples. `train_frac` is
/// clamped to `[0, 1]`.
pub fn split_by_fraction(mut samples: Vec<Sample>, train_frac: f64) -> (Vec<Sample>, Vec<Sample>) {
    let frac = train_frac.clamp(0.0, 1.0);
    let cut = ((samples.len() as f64) * frac).floor() as usize;
    let test = samples.split_off(cut.min(samples.len()));

    info!(
        train = samples.len(),
        test = test.len(),
        train_frac = frac,
        "Split training set"
    );
    (samples, test)
}
