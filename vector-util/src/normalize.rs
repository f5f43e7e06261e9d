use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};

/// L2 normalization of row vectors
pub trait NormalizeRows {
    type Mat;

    fn normalize_rows_inplace(&mut self);
    fn normalize_rows(&self) -> Self::Mat;
}

impl NormalizeRows for Array2<f32> {
    type Mat = Self;

    fn normalize_rows_inplace(&mut self) {
        self.axis_iter_mut(Axis(0)).into_par_iter().for_each(|mut row| {
            let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0_f32 {
                row.mapv_inplace(|x| x / norm);
            }
        });
    }

    fn normalize_rows(&self) -> Self::Mat {
        let mut ret = self.clone();
        ret.normalize_rows_inplace();
        ret
    }
}
