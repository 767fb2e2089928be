use denclue::cluster::density::influence;
use denclue::io::parse_row;
use denclue::{Clustering, Dataset, Denclue, Point, NOISE};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_labels_cover_every_point(
        data in prop::collection::vec(prop::collection::vec(-10.0f64..10.0, 2), 1..20),
        sigma in 0.5f64..2.0,
        xi in 0.5f64..4.0,
    ) {
        let model = Denclue::new(sigma, xi);
        let labels = model.fit_predict(&data).unwrap();

        prop_assert_eq!(labels.len(), data.len());
        let n_clusters = labels.iter().filter(|&&l| l != NOISE).max().map_or(0, |&m| m + 1);
        for &l in &labels {
            prop_assert!(l == NOISE || l < n_clusters);
        }
    }

    #[test]
    fn prop_influence_is_symmetric_and_bounded(
        a in prop::collection::vec(-100.0f64..100.0, 3),
        b in prop::collection::vec(-100.0f64..100.0, 3),
        sigma in 0.1f64..5.0,
    ) {
        let x = Point::new(a);
        let y = Point::new(b);

        let xy = influence(&x, &y, sigma);
        prop_assert_eq!(xy, influence(&y, &x, sigma));
        prop_assert!((0.0..=1.0).contains(&xy));
        prop_assert_eq!(influence(&x, &x, sigma), 0.0);
    }

    #[test]
    fn prop_dataset_bounds_are_integers_and_contain_points(
        rows in prop::collection::vec(prop::collection::vec(-50.0f64..50.0, 3), 1..30),
    ) {
        let dataset = Dataset::from_rows(&rows).unwrap();

        for row in &rows {
            for (i, &v) in row.iter().enumerate() {
                prop_assert!(dataset.lower_bounds()[i] <= v);
                prop_assert!(v <= dataset.upper_bounds()[i]);
            }
        }
        for i in 0..3 {
            prop_assert_eq!(dataset.lower_bounds()[i].fract(), 0.0);
            prop_assert_eq!(dataset.upper_bounds()[i].fract(), 0.0);
        }
    }

    #[test]
    fn prop_point_text_round_trips(
        attrs in prop::collection::vec(-1000.0f64..1000.0, 1..5),
    ) {
        let point = Point::new(attrs.clone());
        let parsed = parse_row(&point.to_string(), attrs.len());
        prop_assert_eq!(Point::new(parsed), point);
    }
}
