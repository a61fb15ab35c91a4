use crate::error::ModelError;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

///
/// Zero mean, unit variance standardization of feature columns.
///
/// Uses the population standard deviation. Constant columns get a scale of 1
/// so they map to zero instead of dividing by zero.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some() && self.scale.is_some()
    }

    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }

    pub fn fit(&mut self, data: &Array2<f64>) -> Result<(), ModelError> {
        let mean = data.mean_axis(Axis(0)).ok_or(ModelError::EmptyDataset)?;
        let scale = data
            .std_axis(Axis(0), 0.0)
            .mapv(|std| if std.abs() < f64::EPSILON { 1.0 } else { std });

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(())
    }

    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        let (Some(mean), Some(scale)) = (&self.mean, &self.scale) else {
            return Err(ModelError::ScalerNotFitted);
        };

        if data.ncols() != mean.len() {
            return Err(ModelError::FeatureCount {
                expected: mean.len(),
                received: data.ncols(),
            });
        }

        Ok((data - mean) / scale)
    }

    pub fn fit_transform(&mut self, data: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        self.fit(data)?;
        self.transform(data)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn transform_before_fit_fails() {
        let scaler = StandardScaler::new();
        let result = scaler.transform(&array![[1.0, 2.0]]);

        assert!(!scaler.is_fitted());
        assert!(matches!(result, Err(ModelError::ScalerNotFitted)));
    }

    #[test]
    fn fit_transform_standardizes_columns() {
        let data = array![[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]];

        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&data).unwrap();

        assert_eq!(scaler.mean().unwrap(), &array![3.0, 10.0]);

        let column = scaled.column(0);
        assert!(column.sum().abs() < 1e-12);
        assert!((column.mapv(|v| v * v).mean().unwrap() - 1.0).abs() < 1e-12);

        // constant column maps to zero
        assert!(scaled.column(1).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn wrong_feature_count_is_rejected() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();

        let result = scaler.transform(&array![[1.0, 2.0, 3.0]]);
        assert!(matches!(
            result,
            Err(ModelError::FeatureCount {
                expected: 2,
                received: 3
            })
        ));
    }

    #[test]
    fn empty_dataset_cannot_be_fitted() {
        let mut scaler = StandardScaler::new();
        let result = scaler.fit(&Array2::zeros((0, 6)));

        assert!(matches!(result, Err(ModelError::EmptyDataset)));
    }

    #[test]
    fn saved_scaler_loads_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");

        let mut scaler = StandardScaler::new();
        scaler
            .fit(&array![[18.0, 0.0], [40.0, 1.0], [85.0, 1.0]])
            .unwrap();
        scaler.save(&path).unwrap();

        let loaded = StandardScaler::load(&path).unwrap();
        assert_eq!(loaded, scaler);
    }
}
