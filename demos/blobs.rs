use std::sync::mpsc;
use std::thread;

use backprop_nn::{Dataset, Layout, Network, TrainConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Three noisy clusters in the unit square, one per class.
fn blobs(n: usize, rng: &mut StdRng) -> Dataset {
    let centers = [[0.2, 0.2], [0.8, 0.3], [0.5, 0.8]];
    let mut images = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let label = i % centers.len();
        let [x, y] = centers[label];
        let jitter_x: f64 = rng.gen_range(-0.12..0.12);
        let jitter_y: f64 = rng.gen_range(-0.12..0.12);
        images.push(vec![x + jitter_x, y + jitter_y]);
        labels.push(label);
    }
    Dataset::new(images, labels).expect("images and labels have equal length")
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let mut rng = StdRng::seed_from_u64(42);
    let mut train = blobs(300, &mut rng);
    let mut test = blobs(90, &mut rng);

    let layout = Layout::new(vec![2, 8, 3]).expect("valid layout");
    let mut network = Network::with_rng(layout, &mut rng);

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(20, 10, 2.0);
    config.seed = Some(7);
    config.progress_tx = Some(tx);

    let printer = thread::spawn(move || {
        for stats in rx {
            println!(
                "epoch {:>2}/{}: {}/{} correct, cost {:.4}",
                stats.epoch + 1,
                stats.total_epochs,
                stats.correct,
                stats.total,
                stats.train_cost
            );
        }
    });

    network
        .train(&mut train, &mut test, &config)
        .expect("training failed");
    drop(config);
    printer.join().expect("printer thread panicked");

    for point in [[0.2, 0.2], [0.8, 0.3], [0.5, 0.8]] {
        let class = network.predict(&point).expect("input matches layout");
        println!("Input: {:?} -> class {}", point, class);
    }
}
