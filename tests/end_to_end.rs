//! Integration tests: full training runs on small synthetic data sets.

use backprop_nn::{Dataset, Layout, Network, TrainConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Two well separated 4-dimensional classes: class 0 is bright on the first
/// two features, class 1 on the last two. Classes alternate.
fn separable(n: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut images: Vec<Vec<f64>> = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let label = i % 2;
        let base = if label == 0 { [0.9, 0.8, 0.1, 0.2] } else { [0.1, 0.2, 0.9, 0.8] };
        images.push(base.iter().map(|b| *b + rng.gen_range(-0.1..0.1)).collect());
        labels.push(label);
    }
    Dataset::new(images, labels).unwrap()
}

#[test]
fn learns_linearly_separable_classes() {
    let layout = Layout::new(vec![4, 3, 2]).unwrap();
    let mut network = Network::with_rng(layout, &mut StdRng::seed_from_u64(2024));
    let mut train = separable(20, 1);
    let mut test = separable(10, 2);

    let mut config = TrainConfig::new(50, 5, 1.0);
    config.seed = Some(7);

    let history = network.train(&mut train, &mut test, &config).unwrap();

    assert_eq!(history.len(), 50);
    let last = history.last().unwrap();
    assert_eq!(last.total, 10);
    assert!(
        last.accuracy() > 0.9,
        "final accuracy {}/{}",
        last.correct,
        last.total
    );
    assert!(last.train_cost < history[0].train_cost);
}

#[test]
fn training_preserves_sample_label_pairs() {
    let layout = Layout::new(vec![4, 3, 2]).unwrap();
    let mut network = Network::with_rng(layout, &mut StdRng::seed_from_u64(5));
    let mut train = separable(20, 3);
    let mut test = separable(10, 4);
    let (orig_train, orig_test) = (train.clone(), test.clone());

    let mut config = TrainConfig::new(3, 4, 0.5);
    config.seed = Some(11);
    network.train(&mut train, &mut test, &config).unwrap();

    for (data, original) in [(&train, &orig_train), (&test, &orig_test)] {
        assert_eq!(data.len(), original.len());
        for (image, label) in data.iter() {
            assert!(original.iter().any(|(o_image, o_label)| o_image == image && o_label == label));
        }
    }
    assert_ne!(train, orig_train);
}

#[test]
fn remainder_policy_still_evaluates_every_epoch() {
    let layout = Layout::new(vec![4, 2]).unwrap();
    let mut network = Network::with_rng(layout, &mut StdRng::seed_from_u64(8));
    let mut train = separable(7, 5);
    let mut test = separable(6, 6);

    // 7 samples, batches of 3: one sample sits out each epoch
    let mut config = TrainConfig::new(4, 3, 1.0);
    config.seed = Some(3);
    let history = network.train(&mut train, &mut test, &config).unwrap();

    assert_eq!(history.len(), 4);
    assert!(history.iter().all(|s| s.total == 6));

    // a batch larger than the training set never updates anything
    let mut untouched = Network::with_rng(Layout::new(vec![4, 2]).unwrap(), &mut StdRng::seed_from_u64(8));
    let before = untouched.layers()[0].weights().clone();
    let history = untouched
        .train(&mut separable(7, 5), &mut separable(6, 6), &TrainConfig::new(2, 8, 1.0))
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(untouched.layers()[0].weights(), &before);
}
