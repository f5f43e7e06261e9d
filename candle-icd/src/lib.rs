pub mod candle_icd_dataset;
pub mod candle_icd_decoder;
pub mod candle_model_traits;
pub mod candle_vocabulary;

pub use candle_core;
pub use candle_nn;
