use veldwerk_core::geocode::{parse_address, GeocodeCache};

#[test]
fn cache_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("geocode_cache.json");

    let mut cache = GeocodeCache::load(&path);
    assert!(cache.is_empty());

    cache.insert(52.0907, 5.1214, "Kerkstraat, Utrecht".to_string());
    cache.save().expect("save failed");

    let reloaded = GeocodeCache::load(&path);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get(52.0907, 5.1214), Some("Kerkstraat, Utrecht"));
    assert_eq!(reloaded.get(52.0, 5.0), None);
}

#[test]
fn corrupt_cache_file_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("geocode_cache.json");
    std::fs::write(&path, "{ not json").expect("write failed");

    let cache = GeocodeCache::load(&path);
    assert!(cache.is_empty());

    // And the bad file is replaced on save.
    cache.save().expect("save failed");
    let reloaded = GeocodeCache::load(&path);
    assert!(reloaded.is_empty());
}

#[test]
fn address_parsing_extracts_street_and_place() {
    let full = "1, Kerkstraat, Binnenstad, Utrecht, Utrecht, Nederland, 3511 KA, Nederland";
    let (street, place) = parse_address(Some(full));
    assert_eq!(street.as_deref(), Some("Kerkstraat 1"));
    assert_eq!(place.as_deref(), Some("Utrecht"));
}

#[test]
fn short_addresses_fall_back_to_the_last_component() {
    let (street, place) = parse_address(Some("Dorpsweg, Achterveld"));
    assert_eq!(street.as_deref(), Some("Achterveld Dorpsweg"));
    assert_eq!(place.as_deref(), Some("Achterveld"));
}

#[test]
fn missing_or_blank_addresses_parse_to_nothing() {
    assert_eq!(parse_address(None), (None, None));
    assert_eq!(parse_address(Some("   ")), (None, None));
    assert_eq!(parse_address(Some(",,")), (None, None));
}

#[test]
fn single_component_has_no_street() {
    let (street, place) = parse_address(Some("Utrecht"));
    assert_eq!(street, None);
    assert_eq!(place.as_deref(), Some("Utrecht"));
}
