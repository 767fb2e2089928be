//! DENCLUE on a simple 2D dataset.

use denclue::{Clustering, Denclue, NOISE};

fn main() {
    // Two tight groups and one stray point.
    let data: Vec<Vec<f64>> = vec![
        // Group A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Group B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Stray
        vec![12.0, -3.0],
    ];

    let model = Denclue::new(1.0, 1.5);

    let fit = model.fit(&data).unwrap();
    println!("=== DENCLUE (sigma=1.0, xi=1.5) ===");
    for (i, cluster) in fit.clusters().iter().enumerate() {
        println!("cluster {} attractor ({})", i + 1, cluster.attractor);
        for (point, index) in cluster.members.iter().zip(&cluster.member_indices) {
            println!("  point {index:2} ({point}) density {:.3}", point.density());
        }
    }

    let labels = model.fit_predict(&data).unwrap();
    println!("\n=== labels ===");
    for (i, label) in labels.iter().enumerate() {
        let tag = if *label == NOISE {
            "NOISE".to_string()
        } else {
            format!("cluster {}", label)
        };
        println!("  point {:2} ({:5.1}, {:5.1}) => {}", i, data[i][0], data[i][1], tag);
    }
}
