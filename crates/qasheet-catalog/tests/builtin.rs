use pretty_assertions::assert_eq;
use proptest::prelude::*;
use qasheet_catalog::{verify, Catalog, CatalogError, CatalogIssue, Locale};

const DECLARED_TOTALS: [u32; 11] = [12, 17, 14, 10, 12, 8, 10, 12, 10, 8, 10];

#[test]
fn builtin_catalogs_are_consistent() {
    for locale in Locale::ALL {
        let catalog = Catalog::builtin(locale).unwrap();
        assert_eq!(catalog.locale, locale);
        assert_eq!(verify(&catalog), Vec::<CatalogIssue>::new(), "{locale}");
    }
}

#[test]
fn declared_totals_match_scenario_counts() {
    for locale in Locale::ALL {
        let catalog = Catalog::builtin(locale).unwrap();
        let declared: Vec<u32> = catalog.sections.iter().map(|s| s.total).collect();
        let counted: Vec<u32> = catalog
            .sections
            .iter()
            .map(|s| s.scenarios.len() as u32)
            .collect();
        assert_eq!(declared, DECLARED_TOTALS);
        assert_eq!(counted, DECLARED_TOTALS);
        assert_eq!(catalog.total, 123);
        assert_eq!(catalog.scenario_count(), 123);
    }
}

#[test]
fn registration_and_marathon_come_first() {
    let en = Catalog::builtin(Locale::En).unwrap();
    assert_eq!(en.sections[0].name, "Registration");
    assert_eq!(en.section_by_name("Registration").unwrap().scenarios.len(), 12);
    assert_eq!(en.sections[1].name, "Marathon");
    assert_eq!(en.section_by_name("Marathon").unwrap().scenarios.len(), 17);

    let ru = Catalog::builtin(Locale::Ru).unwrap();
    assert_eq!(ru.sections[0].name, "Регистрация");
    assert_eq!(ru.sections[1].name, "Марафон");
}

#[test]
fn locales_share_ids_and_priorities() {
    let en = Catalog::builtin(Locale::En).unwrap();
    let ru = Catalog::builtin(Locale::Ru).unwrap();
    let shape = |c: &Catalog| -> Vec<(String, bool)> {
        c.sections
            .iter()
            .flat_map(|s| s.scenarios.iter().map(|x| (x.id.clone(), x.critical)))
            .collect()
    };
    assert_eq!(shape(&en), shape(&ru));
}

#[test]
fn catalog_file_loads_and_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let catalog = Catalog::builtin(Locale::En).unwrap();
    std::fs::write(&path, serde_json::to_string_pretty(&catalog).unwrap()).unwrap();
    assert_eq!(Catalog::from_path(&path).unwrap(), catalog);

    let missing = dir.path().join("missing.json");
    match Catalog::from_path(&missing) {
        Err(CatalogError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected io error, got {other:?}"),
    }
}

proptest! {
    // Dropping any scenario breaks its section's declared total.
    #[test]
    fn removing_a_scenario_is_detected(section in 0usize..11, pick in 0usize..8) {
        let mut catalog = Catalog::builtin(Locale::En).unwrap();
        let scenarios = &mut catalog.sections[section].scenarios;
        let idx = pick % scenarios.len();
        scenarios.remove(idx);

        let issues = verify(&catalog);
        let mismatch_reported = issues
            .iter()
            .any(|i| matches!(i, CatalogIssue::SectionTotalMismatch { .. }));
        prop_assert!(mismatch_reported);
    }
}
