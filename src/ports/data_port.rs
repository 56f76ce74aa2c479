//! Price data access port trait.

use crate::domain::error::MacrossError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `identifier` in chronological order. `None` bounds are open.
    fn fetch_bars(
        &self,
        identifier: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, MacrossError>;

    fn list_instruments(&self) -> Result<Vec<String>, MacrossError>;
}
