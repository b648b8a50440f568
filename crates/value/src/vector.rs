use std::cmp::Ordering;

use crate::numeric::compare_f64;

/// A dense vector of doubles. Orders by dimension first, then element-wise.
#[derive(Clone, Debug, Default)]
pub struct VectorValue(Vec<f64>);

impl VectorValue {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn compare(&self, other: &VectorValue) -> Ordering {
        self.0.len().cmp(&other.0.len()).then_with(|| {
            self.0
                .iter()
                .zip(&other.0)
                .map(|(l, r)| compare_f64(*l, *r))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }
}

impl From<Vec<f64>> for VectorValue {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::VectorValue;

    #[test]
    fn test_dimension_orders_first() {
        let ordered = [
            VectorValue::new(vec![]),
            VectorValue::new(vec![100.0]),
            VectorValue::new(vec![1.0, 2.0, 3.0]),
            VectorValue::new(vec![1.0, 3.0, 2.0]),
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].compare(&pair[1]).is_lt());
        }
    }
}
