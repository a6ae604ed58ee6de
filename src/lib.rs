pub mod dsp;
pub mod input; // Raw device events -> note transitions
pub mod registry; // Note table, tuning math, keyboard geometry
pub mod synth; // Voice bookkeeping and realtime rendering

pub const MAX_BLOCK_SIZE: usize = 2048;
