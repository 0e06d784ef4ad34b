use tkp_challenges::temporal_knapsack::{Challenge, MalformedInstanceError, Solution, Track};

const SAMPLE: &str = "4\n10\n50 6 1 3 \n40 5 2 4 \n30 4 4 5 \n20 10 6 6 \n";

fn sample() -> Challenge {
    SAMPLE.parse().unwrap()
}

#[test]
fn test_parse_instance() {
    let challenge = sample();
    assert_eq!(challenge.num_bids, 4);
    assert_eq!(challenge.capacity, 10);
    assert_eq!(challenge.prices, vec![50, 40, 30, 20]);
    assert_eq!(challenge.demands, vec![6, 5, 4, 10]);
    assert_eq!(challenge.starts, vec![0, 1, 3, 5]);
    assert_eq!(challenge.finishes, vec![3, 4, 5, 6]);
    assert_eq!(challenge.horizon, 6);
    assert_eq!(challenge.interval(1), 1..4);
}

#[test]
fn test_display_matches_file_format() {
    let challenge = sample();
    let rendered = challenge.to_string();
    assert_eq!(rendered, "4\n10\n50 6 1 3\n40 5 2 4\n30 4 4 5\n20 10 6 6\n");
    assert_eq!(rendered.parse::<Challenge>().unwrap(), challenge);
}

#[test]
fn test_parse_empty_instance() {
    let challenge: Challenge = "0\n7\n".parse().unwrap();
    assert_eq!(challenge.num_bids, 0);
    assert_eq!(challenge.horizon, 0);
    assert_eq!(challenge.evaluate_total_price(&Solution::new()).unwrap(), 0);
}

#[test]
fn test_malformed_instances() {
    assert_eq!(
        "".parse::<Challenge>(),
        Err(MalformedInstanceError::MissingHeader("bid count"))
    );
    assert_eq!(
        "1\n".parse::<Challenge>(),
        Err(MalformedInstanceError::MissingHeader("capacity"))
    );
    assert_eq!(
        "1\n5\n10 5 1\n".parse::<Challenge>(),
        Err(MalformedInstanceError::ShortRow { line: 3, fields: 3 })
    );
    // blank lines still count towards the reported line
    assert_eq!(
        "2\n5\n10 5 1 2\n\n7 1\n".parse::<Challenge>(),
        Err(MalformedInstanceError::ShortRow { line: 5, fields: 2 })
    );
    assert_eq!(
        "2\n5\n10 5 1 2\n".parse::<Challenge>(),
        Err(MalformedInstanceError::BidCountMismatch {
            expected: 2,
            found: 1
        })
    );
    assert_eq!(
        "1\n5\n10 5 1 2\n10 5 1 2\n".parse::<Challenge>(),
        Err(MalformedInstanceError::BidCountMismatch {
            expected: 1,
            found: 2
        })
    );
    assert_eq!(
        "1\n5\n10 5 3 2\n".parse::<Challenge>(),
        Err(MalformedInstanceError::InvertedInterval {
            bid: 0,
            start: 3,
            finish: 2
        })
    );
    assert_eq!(
        "1\n5\n10 5 0 2\n".parse::<Challenge>(),
        Err(MalformedInstanceError::ZeroStart { bid: 0 })
    );
    assert_eq!(
        "1\n5\n10 -5 1 2\n".parse::<Challenge>(),
        Err(MalformedInstanceError::InvalidInteger {
            line: 3,
            token: "-5".to_string()
        })
    );
}

#[test]
fn test_trailing_fields_are_ignored() {
    let challenge: Challenge = "2\n5\n10 5 1 2 x\n7 1 2 3 -1 4\n".parse().unwrap();
    assert_eq!(challenge.prices, vec![10, 7]);
    assert_eq!(challenge.finishes, vec![2, 3]);
    assert_eq!(
        "1\n5\n10 5 x 2 9\n".parse::<Challenge>(),
        Err(MalformedInstanceError::InvalidInteger {
            line: 3,
            token: "x".to_string()
        })
    );
}

#[test]
fn test_serde_validates_rows() {
    let challenge = sample();
    let json = serde_json::to_value(&challenge).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "capacity": 10,
            "bids": [[50, 6, 1, 3], [40, 5, 2, 4], [30, 4, 4, 5], [20, 10, 6, 6]],
        })
    );
    assert_eq!(serde_json::from_value::<Challenge>(json).unwrap(), challenge);

    let inverted = serde_json::json!({ "capacity": 5, "bids": [[10, 5, 3, 2]] });
    let err = serde_json::from_value::<Challenge>(inverted).unwrap_err();
    assert!(err.to_string().contains("starts at 3 after it finishes at 2"));
    let short = serde_json::json!({ "capacity": 5, "bids": [[10, 5, 1]] });
    assert!(serde_json::from_value::<Challenge>(short).is_err());
}

#[test]
fn test_evaluate_total_price() {
    let challenge = sample();
    assert_eq!(
        challenge
            .evaluate_total_price(&Solution { items: vec![0, 2] })
            .unwrap(),
        80
    );
    // bids 0 and 1 overlap on times 2..3 with demand 11
    let err = challenge
        .evaluate_total_price(&Solution { items: vec![0, 1] })
        .unwrap_err();
    assert!(err.to_string().contains("at time 2"));
    assert!(challenge
        .verify_solution(&Solution { items: vec![2, 2] })
        .is_err());
    assert!(challenge
        .verify_solution(&Solution { items: vec![4] })
        .is_err());
    assert!(challenge
        .verify_solution(&Solution { items: vec![3, 1] })
        .is_ok());
}

#[test]
fn test_time_demand_profile() {
    let challenge = sample();
    assert_eq!(
        challenge.time_demand_profile(&[true, false, true, true]),
        vec![6, 6, 6, 4, 4, 10]
    );
    assert_eq!(challenge.time_demand_profile(&[false; 4]), vec![0; 6]);
}

#[test]
fn test_generate_instance() {
    let track = Track {
        num_bids: 40,
        horizon: 20,
        capacity: 30,
        max_price: 100,
        max_demand: 15,
        max_duration: 6,
    };
    let a = Challenge::generate_instance(&[7u8; 32], &track).unwrap();
    let b = Challenge::generate_instance(&[7u8; 32], &track).unwrap();
    let c = Challenge::generate_instance(&[8u8; 32], &track).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.num_bids, 40);
    assert!(a.horizon <= 20);
    for bid in 0..a.num_bids {
        assert!(a.starts[bid] < a.finishes[bid]);
        assert!(a.finishes[bid] - a.starts[bid] <= 6);
        assert!((1..=15).contains(&a.demands[bid]));
        assert!((1..=100).contains(&a.prices[bid]));
    }
    assert_eq!(a.to_string().parse::<Challenge>().unwrap(), a);

    let bad = Track {
        max_duration: 0,
        ..track
    };
    assert!(Challenge::generate_instance(&[0u8; 32], &bad).is_err());
}
