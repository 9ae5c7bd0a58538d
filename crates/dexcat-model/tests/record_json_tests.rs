use dexcat_model::{
    Category, Color, EntityRecord, EvolutionDepth, Generation, ImageRef, SpecialFlag,
};
use proptest::prelude::*;

fn charizard() -> EntityRecord {
    EntityRecord::new(6, "charizard", vec![Category::Fire, Category::Flying])
        .unwrap()
        .with_generation(Generation::new(1).unwrap())
        .with_evolution_depth(EvolutionDepth::Final)
        .with_color(Some(Color::Red))
        .with_image(ImageRef::Remote {
            url: "https://sprites.example/6.png".to_string(),
        })
        .with_localized_name("de", "Glurak")
}

#[test]
fn record_json_uses_service_tags() {
    let value = serde_json::to_value(charizard()).unwrap();
    assert_eq!(value["id"], 6);
    assert_eq!(value["generation"], 1);
    assert_eq!(value["evolution_depth"], 3);
    assert_eq!(value["categories"], serde_json::json!(["fire", "flying"]));
    assert_eq!(value["color"], "red");
    assert_eq!(value["image"]["kind"], "remote");
    assert_eq!(value["localized_names"]["de"], "Glurak");
}

#[test]
fn out_of_domain_numbers_are_rejected_on_decode() {
    let mut value = serde_json::to_value(charizard()).unwrap();
    value["generation"] = serde_json::json!(12);
    assert!(serde_json::from_value::<EntityRecord>(value).is_err());

    let mut value = serde_json::to_value(charizard()).unwrap();
    value["evolution_depth"] = serde_json::json!(4);
    assert!(serde_json::from_value::<EntityRecord>(value).is_err());
}

proptest! {
    #[test]
    fn generation_parse_accepts_exactly_one_through_nine(n in 0u8..=20) {
        let parsed = n.to_string().parse::<Generation>();
        prop_assert_eq!(parsed.is_ok(), (1..=9).contains(&n));
    }

    #[test]
    fn flags_are_a_set(flags in proptest::collection::vec(0usize..3, 0..8)) {
        let mut record = EntityRecord::new(1, "x", vec![Category::Normal]).unwrap();
        for f in &flags {
            record = record.with_flag(SpecialFlag::ALL[*f]);
        }
        let distinct: std::collections::BTreeSet<_> = flags.iter().collect();
        prop_assert_eq!(record.flags.len(), distinct.len());
    }
}
