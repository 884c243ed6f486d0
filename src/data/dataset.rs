use rand::Rng;

use crate::error::{NetError, Result};

/// Matched input vectors and class labels. The two sequences always have the
/// same length and are only ever reordered together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    images: Vec<Vec<f64>>,
    labels: Vec<usize>,
}

impl Dataset {
    pub fn new(images: Vec<Vec<f64>>, labels: Vec<usize>) -> Result<Dataset> {
        if images.len() != labels.len() {
            return Err(NetError::Data(format!(
                "{} images but {} labels",
                images.len(),
                labels.len()
            )));
        }
        Ok(Dataset { images, labels })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[Vec<f64>] {
        &self.images
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn get(&self, index: usize) -> Option<(&[f64], usize)> {
        Some((self.images.get(index)?.as_slice(), *self.labels.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[f64], usize)> + '_ {
        self.images.iter().map(Vec::as_slice).zip(self.labels.iter().copied())
    }

    /// Checks every sample has `input_size` values and a label below `classes`.
    pub fn validate(&self, input_size: usize, classes: usize) -> Result<()> {
        for (index, (image, label)) in self.iter().enumerate() {
            if image.len() != input_size {
                return Err(NetError::Data(format!(
                    "sample {} has {} values, network expects {}",
                    index,
                    image.len(),
                    input_size
                )));
            }
            if label >= classes {
                return Err(NetError::InvalidLabel { label, classes, index: Some(index) });
            }
        }
        Ok(())
    }

    /// In-place Fisher-Yates shuffle; each image keeps its label.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in (1..self.images.len()).rev() {
            let j = rng.gen_range(0..=i);
            self.images.swap(i, j);
            self.labels.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn tagged(n: usize) -> Dataset {
        // the label is recoverable from the image, so alignment is checkable
        let images = (0..n).map(|i| vec![i as f64, (i * i) as f64]).collect();
        let labels = (0..n).map(|i| i % 7).collect();
        Dataset::new(images, labels).unwrap()
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(matches!(
            Dataset::new(vec![vec![0.0]], vec![0, 1]),
            Err(NetError::Data(_))
        ));
    }

    #[test]
    fn shuffle_keeps_pairs_aligned_and_permutes() {
        let original = tagged(50);
        let mut shuffled = original.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(42));

        assert_eq!(shuffled.len(), original.len());
        for (image, label) in shuffled.iter() {
            assert_eq!(label, image[0] as usize % 7);
        }

        let mut seen: Vec<usize> = shuffled.iter().map(|(image, _)| image[0] as usize).collect();
        assert_ne!(seen, (0..50).collect::<Vec<_>>());
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_of_tiny_sets_is_harmless() {
        let mut empty = Dataset::default();
        empty.shuffle(&mut StdRng::seed_from_u64(1));
        assert!(empty.is_empty());

        let mut single = tagged(1);
        single.shuffle(&mut StdRng::seed_from_u64(1));
        assert_eq!(single, tagged(1));
    }

    #[test]
    fn validate_reports_width_and_label_problems() {
        let data = tagged(10);
        assert!(data.validate(2, 7).is_ok());
        assert!(matches!(data.validate(3, 7), Err(NetError::Data(_))));
        assert!(matches!(
            data.validate(2, 6),
            Err(NetError::InvalidLabel { label: 6, classes: 6, index: Some(6) })
        ));
    }
}
