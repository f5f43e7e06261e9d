pub mod errors;
pub mod feature_cache; // compute-once feature vectors with parquet persistence
pub mod partition; // leak-free train/validation split
pub mod pool; // candidate pool and content lookup
pub mod records; // generated demonstration sequences
pub mod simulate; // helper functions for simulation
