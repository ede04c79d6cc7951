//! Data access port trait.

use crate::domain::error::StratlangError;
use crate::domain::ohlcv::OhlcvBar;
use std::path::Path;

pub trait DataPort {
    /// Load a bar table from the named source. The returned bars are
    /// guaranteed sorted ascending by date with unique dates.
    fn load_bars(&self, source: &Path) -> Result<Vec<OhlcvBar>, StratlangError>;
}
