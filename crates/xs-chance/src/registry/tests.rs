use xs_core::{MemoryCategory, OwnerCategory, Variant, VariantCatalog, share};

use super::*;
use crate::persist::RegistryConfig;

const OWNER: &str = "Empire";

fn catalog() -> VariantCatalog {
    VariantCatalog::new([
        Variant::builtin("Hussar"),
        Variant::builtin("Yttakin"),
        Variant::builtin("Sanguophage").rare(),
    ])
}

fn category() -> MemoryCategory {
    MemoryCategory::new("factions").with_chance(OWNER, "Hussar", 0.3)
}

fn setup_with(config: EngineConfig) -> (EntryRegistry, SharedCategory, VariantCatalog) {
    let shared = share(category());
    let catalog = catalog();
    let mut registry = EntryRegistry::new(OWNER, shared.clone(), config);
    registry.initialize(&catalog).unwrap();
    (registry, shared, catalog)
}

fn setup() -> (EntryRegistry, SharedCategory, VariantCatalog) {
    setup_with(EngineConfig::default())
}

fn raw(registry: &EntryRegistry, name: &str) -> i32 {
    registry.entry(name).unwrap().raw_value()
}

#[test]
fn initialize_derives_baseline_from_defaults() {
    let (registry, _, _) = setup();
    assert!(registry.is_initialized());
    assert_eq!(raw(&registry, "Hussar"), 300);
    assert_eq!(raw(&registry, "Yttakin"), 0);
    assert_eq!(raw(&registry, BASELINE_NAME), 700);
    assert!((registry.baseline_chance() - 0.7).abs() < 1e-6);
    assert_eq!(registry.allowed_sum(), 1000);
    assert!(registry.only_absolute());
}

#[test]
fn raising_an_absolute_takes_from_baseline() {
    let (mut registry, _, _) = setup();
    registry.set_chance("Hussar", 500).unwrap();
    assert_eq!(raw(&registry, BASELINE_NAME), 500);
    assert_eq!(registry.allowed_sum(), 1000);
}

#[test]
fn absolutes_never_exceed_full() {
    let (mut registry, _, _) = setup();
    registry.set_chance("Yttakin", 400).unwrap();
    assert_eq!(raw(&registry, BASELINE_NAME), 300);

    registry.set_chance("Hussar", 800).unwrap();
    assert_eq!(raw(&registry, "Hussar"), 800);
    assert_eq!(raw(&registry, "Yttakin"), 200);
    assert_eq!(raw(&registry, BASELINE_NAME), 0);
}

#[test]
fn baseline_edit_goes_to_entries_in_use() {
    let (mut registry, _, _) = setup();
    registry.set_chance(BASELINE_NAME, 500).unwrap();
    assert_eq!(raw(&registry, "Hussar"), 500);
    assert_eq!(raw(&registry, "Yttakin"), 0);
    assert_eq!(registry.allowed_sum(), 1000);
}

#[test]
fn baseline_edit_spreads_over_all_until_each_has_a_share() {
    let (mut registry, _, _) = setup();
    registry.set_chance("Hussar", 0).unwrap();
    assert_eq!(raw(&registry, BASELINE_NAME), 1000);

    // Five adjustable entries: three built-ins and two generated variants.
    registry.set_chance(BASELINE_NAME, 996).unwrap();
    assert!(registry.distribute_among_all);
    let others: Vec<i32> = registry
        .entries()
        .filter(|e| !e.variant().is_baseline())
        .map(ChanceEntry::raw_value)
        .collect();
    assert_eq!(others.len(), 5);
    assert_eq!(others.iter().sum::<i32>(), 4);
    assert!(others.iter().all(|&r| r <= 1));

    registry.set_chance(BASELINE_NAME, 990).unwrap();
    assert!(!registry.distribute_among_all);
    assert!(
        registry
            .entries()
            .filter(|e| !e.variant().is_baseline())
            .all(|e| e.raw_value() == 2)
    );
}

#[test]
fn generated_variants_absorb_baseline_edits() {
    let shared = share(MemoryCategory::new("factions").with_owner(OWNER));
    let catalog = VariantCatalog::new(Vec::<Variant>::new());
    let mut registry = EntryRegistry::new(OWNER, shared, EngineConfig::default());
    registry.initialize(&catalog).unwrap();

    registry.set_chance(BASELINE_NAME, 600).unwrap();
    assert_eq!(raw(&registry, "::Generated::Random"), 200);
    assert_eq!(raw(&registry, "::Generated::Hybrid"), 200);
    assert_eq!(registry.allowed_sum(), 1000);
}

#[test]
fn weighted_entries_split_the_pool() {
    let (mut registry, _, _) = setup();
    registry.set_entry_mode("Hussar", false).unwrap();
    assert_eq!(registry.entry("Hussar").unwrap().weight(), 1.0);
    assert_eq!(raw(&registry, "Hussar"), 300);

    registry.set_entry_mode("Yttakin", false).unwrap();
    assert_eq!(registry.entry("Yttakin").unwrap().weight(), 0.0);
    assert_eq!(raw(&registry, "Yttakin"), 0);

    registry.set_weight("Yttakin", 1.0).unwrap();
    assert_eq!(raw(&registry, "Hussar"), 150);
    assert_eq!(raw(&registry, "Yttakin"), 150);
    assert_eq!(raw(&registry, BASELINE_NAME), 700);
    assert_eq!(registry.weighted_pool(), 300);
}

#[test]
fn weight_inference_bumps_zero_weights() {
    let (mut registry, _, _) = setup();
    registry.set_entry_mode("Hussar", false).unwrap();
    registry.set_weight("Hussar", 0.0).unwrap();
    // A lone zero weight still takes the even split.
    assert_eq!(raw(&registry, "Hussar"), 300);

    registry.set_chance("Yttakin", 100).unwrap();
    assert_eq!(raw(&registry, BASELINE_NAME), 700);
    assert_eq!(raw(&registry, "Hussar"), 200);

    registry.set_entry_mode("Yttakin", false).unwrap();
    assert_eq!(registry.entry("Hussar").unwrap().weight(), 1.0);
    assert_eq!(registry.entry("Yttakin").unwrap().weight(), 0.5);
    assert_eq!(raw(&registry, "Hussar"), 200);
    assert_eq!(raw(&registry, "Yttakin"), 100);
}

#[test]
fn starved_weights_stay_starved_when_an_entry_joins() {
    let (mut registry, _, _) = setup();
    registry.set_entry_mode("Yttakin", false).unwrap();
    registry.set_weight("Yttakin", 3.24).unwrap();
    assert_eq!(raw(&registry, "Yttakin"), 0);

    registry.set_entry_mode("Hussar", false).unwrap();
    assert_eq!(registry.entry("Hussar").unwrap().weight(), 1.0);
    assert_eq!(registry.entry("Yttakin").unwrap().weight(), 0.0);
    assert_eq!(raw(&registry, "Hussar"), 300);
    assert_eq!(raw(&registry, "Yttakin"), 0);

    registry.set_entry_mode("Hussar", true).unwrap();
    assert_eq!(raw(&registry, "Hussar"), 300);
    assert_eq!(raw(&registry, BASELINE_NAME), 700);
    assert_eq!(registry.allowed_sum(), 1000);
}

#[test]
fn empty_pool_infers_zero_weight() {
    let (mut registry, _, _) = setup();
    registry.set_entry_mode("Yttakin", false).unwrap();
    assert_eq!(registry.entry("Yttakin").unwrap().weight(), 0.0);
    assert_eq!(raw(&registry, "Yttakin"), 0);
    assert_eq!(registry.allowed_sum(), 1000);
}

#[test]
fn bulk_mode_switch_keeps_chances() {
    let (mut registry, _, _) = setup();
    registry.set_is_absolute_for_allowed(false).unwrap();
    assert!(registry.only_weighted());
    assert_eq!(registry.entry("Hussar").unwrap().weight(), 1.0);
    assert_eq!(raw(&registry, "Hussar"), 300);
    assert_eq!(raw(&registry, BASELINE_NAME), 700);
    assert_eq!(raw(&registry, "Yttakin"), 0);

    registry.set_is_absolute_for_allowed(true).unwrap();
    assert!(registry.only_absolute());
    assert_eq!(raw(&registry, "Hussar"), 300);
    assert_eq!(raw(&registry, BASELINE_NAME), 700);
}

#[test]
fn bulk_weight_evens_out_weighted_entries() {
    let (mut registry, _, _) = setup();
    registry.set_entry_mode("Hussar", false).unwrap();
    registry.set_entry_mode("Yttakin", false).unwrap();
    registry.set_weight_for_allowed_weighted(2.0).unwrap();
    assert_eq!(raw(&registry, "Hussar"), 150);
    assert_eq!(raw(&registry, "Yttakin"), 150);
}

#[test]
fn mode_errors() {
    let (mut registry, _, _) = setup();
    assert!(matches!(
        registry.set_weight_from_absolute_value("Hussar"),
        Err(ChanceError::NotWeighted(_))
    ));
    registry.set_entry_mode("Hussar", false).unwrap();
    assert!(matches!(
        registry.set_chance("Hussar", 100),
        Err(ChanceError::NotAbsolute(_))
    ));
}

#[test]
fn unknown_entry_is_an_error() {
    let (mut registry, _, _) = setup();
    let err = registry.set_chance("Impid", 100).unwrap_err();
    assert!(matches!(err, ChanceError::UnknownEntry { ref name, .. } if name == "Impid"));
    assert!(registry.set_entry_chance("Impid", true).is_err());
}

#[test]
fn disallowed_entries_only_hold_zero() {
    let (mut registry, _, _) = setup();
    registry.set_allow_rare(false).unwrap();
    assert!(matches!(
        registry.set_chance("Sanguophage", 10),
        Err(ChanceError::DisallowedEntry { raw: 10, .. })
    ));
    registry.set_chance("Sanguophage", 0).unwrap();
    assert_eq!(registry.allowed_sum(), 1000);
}

#[test]
fn disallowing_rare_zeroes_them() {
    let (mut registry, _, _) = setup();
    registry.set_chance("Sanguophage", 200).unwrap();
    assert_eq!(raw(&registry, BASELINE_NAME), 500);

    registry.set_allow_rare(false).unwrap();
    assert_eq!(raw(&registry, "Sanguophage"), 0);
    assert_eq!(raw(&registry, BASELINE_NAME), 700);
    assert_eq!(registry.allowed_sum(), 1000);
    assert!(registry.all_allowed_entries().all(|e| e.name() != "Sanguophage"));
}

#[test]
fn builtin_chances_reach_the_store() {
    let (mut registry, shared, _) = setup();
    registry.set_chance("Hussar", 450).unwrap();
    registry.set_chance("Yttakin", 50).unwrap();

    let category = shared.borrow();
    assert_eq!(category.find_chance(OWNER, "Hussar"), Some(0.45));
    assert_eq!(category.find_chance(OWNER, "Yttakin"), Some(0.05));
    assert_eq!(category.find_chance(OWNER, BASELINE_NAME), None);
}

#[test]
fn propagation_can_be_switched_off() {
    let (mut registry, shared, _) =
        setup_with(EngineConfig::default().with_propagate_builtin(false));
    registry.set_chance("Yttakin", 50).unwrap();
    assert_eq!(shared.borrow().find_chance(OWNER, "Yttakin"), None);
}

#[test]
fn stored_config_attaches_when_variant_appears() {
    let (mut registry, _, _) = setup();
    let saved = RegistryConfig {
        allow_rare: true,
        entries: BTreeMap::from([("Impid".to_string(), EntryConfig::absolute(200))]),
    };
    registry.load(&saved).unwrap();
    assert_eq!(registry.unloaded_entries().count(), 1);

    registry.attach(&Variant::custom("Impid")).unwrap();
    assert_eq!(registry.unloaded_entries().count(), 0);
    assert_eq!(raw(&registry, "Impid"), 200);
    assert_eq!(raw(&registry, BASELINE_NAME), 500);
}

#[test]
fn removing_an_override_falls_back_to_builtin() {
    let (mut registry, shared, mut catalog) = setup();
    let custom = catalog.add_custom(Variant::custom("Hussar")).unwrap().clone();
    registry.attach(&custom).unwrap();
    assert_eq!(registry.entry("Hussar").unwrap().variant(), &custom);
    assert_eq!(raw(&registry, "Hussar"), 300);
    assert_eq!(shared.borrow().find_chance(OWNER, "Hussar"), None);

    catalog.remove_custom("Hussar");
    registry.remove_entry("Hussar", &catalog).unwrap();
    assert!(registry.entry("Hussar").unwrap().variant().is_builtin());
    assert_eq!(raw(&registry, "Hussar"), 300);
    assert_eq!(shared.borrow().find_chance(OWNER, "Hussar"), Some(0.3));
}

#[test]
fn removing_a_custom_variant_drops_it() {
    let (mut registry, _, mut catalog) = setup();
    let impid = catalog.add_custom(Variant::custom("Impid")).unwrap().clone();
    registry.attach(&impid).unwrap();
    registry.set_chance("Impid", 250).unwrap();
    assert_eq!(raw(&registry, BASELINE_NAME), 450);

    catalog.remove_custom("Impid");
    registry.remove_entry("Impid", &catalog).unwrap();
    assert!(registry.entry("Impid").is_none());
    assert_eq!(raw(&registry, BASELINE_NAME), 700);
    assert_eq!(registry.allowed_sum(), 1000);
}

#[test]
fn baseline_and_builtins_are_never_removed() {
    let (mut registry, _, catalog) = setup();
    registry.remove_entry(BASELINE_NAME, &catalog).unwrap();
    registry.remove_entry("Hussar", &catalog).unwrap();
    assert!(registry.entry(BASELINE_NAME).is_some());
    assert!(registry.entry("Hussar").is_some());
}

#[test]
fn reset_restores_defaults_and_filter() {
    let (mut registry, _, _) = setup();
    registry.set_chance("Yttakin", 400).unwrap();
    registry.set_entry_mode("Hussar", false).unwrap();
    registry.set_allow_rare(false).unwrap();
    registry
        .load(&RegistryConfig {
            allow_rare: false,
            entries: BTreeMap::from([("Impid".to_string(), EntryConfig::absolute(10))]),
        })
        .unwrap();

    registry.reset().unwrap();
    assert!(registry.allow_rare());
    assert_eq!(registry.unloaded_entries().count(), 0);
    assert!(registry.only_absolute());
    assert_eq!(raw(&registry, "Hussar"), 300);
    assert_eq!(raw(&registry, "Yttakin"), 0);
    assert_eq!(raw(&registry, BASELINE_NAME), 700);
}

#[test]
fn expose_skips_untouched_registries() {
    let (mut registry, _, _) = setup();
    assert!(!registry.requires_saving());
    assert_eq!(registry.expose(), None);

    registry.set_chance("Hussar", 100).unwrap();
    let saved = registry.expose().unwrap();
    assert_eq!(saved.entries["Hussar"].raw, Some(100));
    assert_eq!(saved.entries[BASELINE_NAME].raw, Some(900));
}

#[test]
fn expose_everything_when_skipping_is_off() {
    let (registry, _, _) = setup_with(EngineConfig::default().with_skip_default_on_save(false));
    let saved = registry.expose().unwrap();
    assert_eq!(saved.entries.len(), registry.entries().count());
}

#[test]
fn load_before_initialize_is_applied_on_attach() {
    let shared = share(category());
    let mut registry = EntryRegistry::new(OWNER, shared, EngineConfig::default());
    registry
        .load(&RegistryConfig {
            allow_rare: true,
            entries: BTreeMap::from([
                ("Hussar".to_string(), EntryConfig::absolute(100)),
                ("Yttakin".to_string(), EntryConfig::absolute(250)),
            ]),
        })
        .unwrap();
    registry.initialize(&catalog()).unwrap();

    assert_eq!(raw(&registry, "Hussar"), 100);
    assert_eq!(raw(&registry, "Yttakin"), 250);
    assert_eq!(raw(&registry, BASELINE_NAME), 650);
}

#[test]
fn overfull_saved_state_is_fitted_on_initialize() {
    let shared = share(category());
    let mut registry = EntryRegistry::new(OWNER, shared, EngineConfig::default());
    registry
        .load(&RegistryConfig {
            allow_rare: true,
            entries: BTreeMap::from([
                ("Hussar".to_string(), EntryConfig::absolute(800)),
                ("Yttakin".to_string(), EntryConfig::absolute(600)),
            ]),
        })
        .unwrap();
    registry.initialize(&catalog()).unwrap();

    assert_eq!(raw(&registry, BASELINE_NAME), 0);
    assert_eq!(registry.allowed_sum(), 1000);
}

#[test]
fn text_edits_keep_partial_input() {
    let (mut registry, _, _) = setup();
    registry.set_chance_text("Hussar", "12.").unwrap();
    let hussar = registry.entry("Hussar").unwrap();
    assert_eq!(hussar.raw_value(), 120);
    assert_eq!(hussar.chance_text(), "12.");

    registry.set_chance_text("Hussar", "abc").unwrap();
    let hussar = registry.entry("Hussar").unwrap();
    assert_eq!(hussar.raw_value(), 0);
    assert_eq!(hussar.chance_text(), "0");

    registry.set_entry_mode("Yttakin", false).unwrap();
    registry.set_weight_text("Yttakin", "").unwrap();
    let yttakin = registry.entry("Yttakin").unwrap();
    assert_eq!(yttakin.weight(), 0.0);
    assert_eq!(yttakin.weight_text(), "");
}
