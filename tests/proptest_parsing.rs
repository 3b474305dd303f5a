use landmark_guide::parse::parse_confidence;
use landmark_guide::parse_detections;
use landmark_guide::tests::util::test_catalog;
use proptest::prelude::*;

const IDS: [&str; 4] = ["bayterek", "khan_shatyr", "botanical_garden", "eiffel_tower"];

fn line() -> impl Strategy<Value = String> {
    (0usize..IDS.len(), 0.0f64..=1.0, prop_oneof![Just(":"), Just(" = "), Just(" - ")])
        .prop_map(|(i, c, sep)| format!("{}{}{:.2}", IDS[i], sep, c))
}

proptest! {
    #[test]
    fn never_panics_on_arbitrary_text(raw in any::<String>()) {
        let _ = parse_detections(&raw, &test_catalog());
    }

    #[test]
    fn detections_are_from_catalog_and_in_range(lines in prop::collection::vec(line(), 1..6)) {
        let catalog = test_catalog();
        let raw = lines.join("\n");
        let detections = parse_detections(&raw, &catalog).unwrap();
        for d in &detections {
            prop_assert!(catalog.get(&d.landmark_id).is_some());
            prop_assert!((0.0..=1.0).contains(&d.confidence));
        }
        for pair in detections.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
            prop_assert_ne!(&pair[0].landmark_id, &pair[1].landmark_id);
        }
    }

    #[test]
    fn same_text_same_result(lines in prop::collection::vec(line(), 1..6)) {
        let catalog = test_catalog();
        let raw = lines.join("\n");
        let first = parse_detections(&raw, &catalog).unwrap();
        let second = parse_detections(&raw, &catalog).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn confidence_is_always_in_unit_range(token in "[+-]?[0-9.,]{0,8}%?") {
        let c = parse_confidence(&token);
        prop_assert!((0.0..=1.0).contains(&c));
    }
}
