// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator math over oldest-first price slices.  Every
// public entry point returns `Option<T>` (or an empty `Vec`) so callers are
// forced to handle insufficient-data and numerical-edge-case scenarios.

pub mod adx;
pub mod ema;
pub mod macd;
pub mod psar;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use macd::MacdValue;
pub use stochastic::StochasticValue;
