pub mod common_io; // line-oriented file IO, gz-aware
pub mod errors;
pub mod normalize;
pub mod parquet_io; // dense feature matrix IO
pub mod similarity; // exact inner-product nearest-neighbour index
pub mod topk;
