pub mod rolling_series;

pub use rolling_series::{PriceSeries, PriceWindow, RollingSeries};
