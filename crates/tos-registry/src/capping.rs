//! Cumulative size budget
//!
//! A file is capped when the running total of sizes, up to and including
//! that file in registration order, exceeds the budget. Once the total is
//! over budget every later file is capped too.
//!
//! Flags are always computed for the whole sequence. A single reorder can
//! change every flag after the moved entry, so nothing here is patched
//! incrementally.

use crate::record::{FileRecord, MIB};

/// Cap flags for `sizes`, index-aligned with the input
///
/// Entry `i` is capped iff `sizes[0] + ... + sizes[i] > budget_bytes`.
#[must_use]
pub fn capped<I>(sizes: I, budget_bytes: u64) -> Vec<bool>
where
    I: IntoIterator<Item = u64>,
{
    let mut total = 0u64;
    sizes
        .into_iter()
        .map(|size| {
            total = total.saturating_add(size);
            total > budget_bytes
        })
        .collect()
}

/// Size budget applied to the registration sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CappingPolicy {
    budget_bytes: u64,
}

impl CappingPolicy {
    /// Budget in bytes
    #[inline]
    #[must_use]
    pub const fn new(budget_bytes: u64) -> Self {
        Self { budget_bytes }
    }

    /// Budget in mebibytes
    ///
    /// Negative or NaN budgets become zero, capping every non-empty file.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn from_mib(mib: f64) -> Self {
        Self::new((mib * MIB as f64).round() as u64)
    }

    #[inline]
    #[must_use]
    pub const fn budget_bytes(&self) -> u64 {
        self.budget_bytes
    }

    /// Flags for records in the given order
    #[must_use]
    pub fn apply<'a, I>(&self, records: I) -> Vec<bool>
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        capped(records.into_iter().map(FileRecord::size_bytes), self.budget_bytes)
    }
}

impl Default for CappingPolicy {
    /// 10 MiB
    fn default() -> Self {
        Self::new(10 * MIB)
    }
}
