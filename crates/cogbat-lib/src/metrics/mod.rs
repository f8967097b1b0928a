pub mod summary;

use std::collections::BTreeMap;

/// Named summary scalars for one task file; `None` where no data contributed.
pub type Summary = BTreeMap<String, Option<f64>>;

/// Mean of the present values. `None` for an empty (or all-missing) input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), x| (sum + x, n + 1));
    if n > 0 {
        Some(sum / n as f64)
    } else {
        None
    }
}

pub use summary::summarize;
