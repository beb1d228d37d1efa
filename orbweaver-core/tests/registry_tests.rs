// Tests for the visitor registry lifecycle

use chrono::{Duration, TimeZone, Utc};
use orbweaver_core::RegistryError;
use orbweaver_core::registry::{VisitorRegistry, default_ttl};
use orbweaver_core::visitor::VisitorRecord;
use orbweaver_detect::ClientProfile;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn profile() -> ClientProfile {
    ClientProfile::unknown("test-agent")
}

// ============================================================================
// Upsert Tests
// ============================================================================

#[test]
fn test_upsert_creates_record() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

    registry.upsert("session-a", now, profile, &mut rng);

    let record = registry.get("session-a").expect("record should exist");
    assert_eq!(record.page_visits, 1);
    assert_eq!(record.engagement_score, 10.0);
    assert_eq!(record.first_seen, now);
    assert_eq!(record.last_seen, now);
    assert_eq!(record.name, "Visitor_session-");
    assert_eq!(record.node_type, "visitor");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_upsert_twice_is_one_record() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let first = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let second = first + Duration::minutes(5);

    registry.upsert("session-a", first, profile, &mut rng);
    registry.upsert(
        "session-a",
        second,
        || panic!("classifier must not run on revisit"),
        &mut rng,
    );

    assert_eq!(registry.len(), 1);
    let record = registry.get("session-a").unwrap();
    assert_eq!(record.page_visits, 2);
    assert_eq!(record.first_seen, first);
    assert_eq!(record.last_seen, second);
    assert_eq!(record.engagement_score, 12.0);
}

#[test]
fn test_upsert_layout_hints_assigned_once() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let now = Utc::now();

    registry.upsert("session-a", now, profile, &mut rng);
    let (position, distance) = {
        let record = registry.get("session-a").unwrap();
        (record.radial_position, record.distance)
    };
    registry.upsert("session-a", now + Duration::minutes(1), profile, &mut rng);

    let record = registry.get("session-a").unwrap();
    assert_eq!(record.radial_position, position);
    assert_eq!(record.distance, distance);
    assert!((0.0..std::f64::consts::TAU).contains(&position));
    assert!((100..=300).contains(&distance));
}

#[test]
fn test_upsert_multibyte_session_id() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let now = Utc::now();

    // ids are opaque tokens; truncation for the display name must not
    // split a multibyte char
    registry.upsert("αβγδεζηθικ", now, profile, &mut rng);

    let record = registry.get("αβγδεζηθικ").unwrap();
    assert_eq!(record.name, "Visitor_αβγδεζηθ");
    assert_eq!(record.page_visits, 1);
}

#[test]
fn test_engagement_capped_at_100() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let mut now = Utc::now();

    for _ in 0..50 {
        registry.upsert("session-a", now, profile, &mut rng);
        now += Duration::seconds(10);
    }

    let record = registry.get("session-a").unwrap();
    assert_eq!(record.page_visits, 50);
    assert_eq!(record.engagement_score, 100.0);
}

// ============================================================================
// Pruning Tests
// ============================================================================

#[test]
fn test_prune_removes_stale_keeps_active() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

    registry.upsert("stale", now - Duration::minutes(31), profile, &mut rng);
    registry.upsert("active", now - Duration::minutes(29), profile, &mut rng);

    let removed = registry.prune_expired(now, default_ttl());

    assert_eq!(removed, 1);
    assert!(registry.get("stale").is_none());
    assert!(registry.get("active").is_some());
    assert_eq!(registry.all().len(), 1);
}

#[test]
fn test_prune_boundary_is_exclusive() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

    // exactly at the ttl: age is not strictly less, so the record goes
    registry.upsert("boundary", now - Duration::minutes(30), profile, &mut rng);
    let removed = registry.prune_expired(now, default_ttl());

    assert_eq!(removed, 1);
    assert!(registry.is_empty());
}

#[test]
fn test_prune_empty_registry() {
    let mut registry = VisitorRegistry::new();
    assert_eq!(registry.prune_expired(Utc::now(), default_ttl()), 0);
}

// ============================================================================
// Snapshot Order Tests
// ============================================================================

#[test]
fn test_all_preserves_insertion_order() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let now = Utc::now();

    for id in ["charlie", "alpha", "bravo"] {
        registry.upsert(id, now, profile, &mut rng);
    }

    let ids: Vec<&str> = registry.all().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["charlie", "alpha", "bravo"]);
}

#[test]
fn test_order_survives_pruning() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let now = Utc::now();

    registry.upsert("first", now, profile, &mut rng);
    registry.upsert("middle", now - Duration::hours(1), profile, &mut rng);
    registry.upsert("last", now, profile, &mut rng);

    registry.prune_expired(now, default_ttl());

    let ids: Vec<&str> = registry.all().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "last"]);
}

#[test]
fn test_insert_replaces_without_duplicating_order() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let now = Utc::now();

    let record = VisitorRecord::new("synthetic".to_string(), profile(), now, &mut rng);
    registry.insert(record.clone());
    registry.insert(record);

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.all().len(), 1);
}

// ============================================================================
// Invariant and Serialization Tests
// ============================================================================

#[test]
fn test_validate_healthy_registry() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let now = Utc::now();

    registry.upsert("a", now, profile, &mut rng);
    registry.upsert("a", now + Duration::minutes(1), profile, &mut rng);
    registry.upsert("b", now, profile, &mut rng);

    assert!(registry.validate().is_ok());
}

#[test]
fn test_validate_rejects_out_of_range_engagement() {
    let mut registry = VisitorRegistry::new();
    let mut rng = rng();
    let mut record = VisitorRecord::new("bad".to_string(), profile(), Utc::now(), &mut rng);
    record.engagement_score = 150.0;
    registry.insert(record);

    let err = registry.validate().unwrap_err();
    assert!(matches!(err, RegistryError::InvalidSessionState(_)));
    assert!(err.to_string().contains("engagement"));
}

#[test]
fn test_issue_session_id_is_opaque_and_unique() {
    let a = VisitorRegistry::issue_session_id();
    let b = VisitorRegistry::issue_session_id();

    assert_ne!(a, b);
    assert_eq!(a.len(), 36);
}

#[test]
fn test_record_serializes_wire_shape() {
    let mut rng = rng();
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let record = VisitorRecord::new("abcdef1234".to_string(), profile(), now, &mut rng);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], "abcdef1234");
    assert_eq!(json["name"], "Visitor_abcdef12");
    assert_eq!(json["type"], "visitor");
    assert_eq!(json["page_visits"], 1);
    assert_eq!(json["engagement_score"], 10.0);
    // timestamps cross the JSON boundary as ISO-8601 strings
    assert!(json["first_seen"].as_str().unwrap().starts_with("2024-01-10T12:00:00"));
    assert_eq!(json["client_info"]["browser"]["name"], "Unknown Browser");
}
