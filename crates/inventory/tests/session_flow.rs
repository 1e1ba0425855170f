use proptest::prelude::*;

use stockledger_core::DomainError;
use stockledger_inventory::{AuditAction, InventorySession, ProductEntry, SessionConfig};

#[test]
fn default_session_walkthrough() {
    let mut session = InventorySession::new(SessionConfig::default()).unwrap();
    assert!(session.low_stock().is_empty());

    // Add a new product, top up an existing one.
    session.add_or_increment("Cabo HDMI", 4).unwrap();
    session.add_or_increment("Headset", 5).unwrap();

    // Sell out the notebooks and then some.
    session.purchase("Notebook i5", 12).unwrap();

    // Drop the monitor line.
    session.remove("Monitor 27''").unwrap();

    // Predefined batch.
    let batch = session.batch_add_configured().unwrap();
    assert_eq!(batch.len(), 3);

    let quantities: Vec<(String, i64)> = session
        .current_entries()
        .into_iter()
        .map(|e| (e.name, e.quantity))
        .collect();
    assert_eq!(
        quantities,
        vec![
            ("Mouse Gamer".to_string(), 25),
            ("Teclado Mecânico".to_string(), 15),
            ("Notebook i5".to_string(), 0),
            ("Headset".to_string(), 35),
            ("Cabo HDMI".to_string(), 4),
            ("Webcam Full HD".to_string(), 12),
            ("Mousepad XL".to_string(), 20),
            ("Cadeira Gamer".to_string(), 3),
        ]
    );

    assert_eq!(
        session.low_stock(),
        vec![
            "Notebook i5".to_string(),
            "Cabo HDMI".to_string(),
            "Cadeira Gamer".to_string()
        ]
    );

    let history: Vec<_> = session
        .history()
        .iter()
        .map(|e| (e.action(), e.product().to_string(), e.quantity()))
        .collect();
    assert_eq!(
        history,
        vec![
            (AuditAction::Added, "Cabo HDMI".to_string(), 4),
            (AuditAction::Added, "Headset".to_string(), 5),
            (AuditAction::Purchased, "Notebook i5".to_string(), 12),
            (AuditAction::Removed, "Monitor 27''".to_string(), 10),
            (AuditAction::BatchAdded, "Webcam Full HD".to_string(), 12),
            (AuditAction::BatchAdded, "Mousepad XL".to_string(), 20),
            (AuditAction::BatchAdded, "Cadeira Gamer".to_string(), 3),
        ]
    );

    let sequences: Vec<u64> = session.history().iter().map(|e| e.sequence()).collect();
    assert_eq!(sequences, (1..=7).collect::<Vec<_>>());
    assert_eq!(session.version(), 7);
}

#[test]
fn rejected_batch_is_all_or_nothing() {
    let mut session = InventorySession::new(SessionConfig::empty()).unwrap();

    let err = session.batch_add([("A", 2), ("B", -1)]).unwrap_err();

    assert_eq!(err, DomainError::InvalidQuantity(-1));
    assert!(session.current_entries().is_empty());
    assert!(session.history().is_empty());
}

#[derive(Debug, Clone)]
enum Action {
    Add(usize, i64),
    Remove(usize),
    Purchase(usize, i64),
    Batch(Vec<(usize, i64)>),
}

const NAMES: [&str; 3] = ["Mouse", "Teclado", "Headset"];

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..NAMES.len(), 1i64..50).prop_map(|(n, q)| Action::Add(n, q)),
        (0..NAMES.len()).prop_map(Action::Remove),
        (0..NAMES.len(), 0i64..80).prop_map(|(n, q)| Action::Purchase(n, q)),
        prop::collection::vec((0..NAMES.len(), 1i64..50), 0..4).prop_map(Action::Batch),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Property: every effective change adds exactly one audit entry, in call
    /// order; operations on missing products add none; a batch adds one
    /// entry per item.
    #[test]
    fn audit_log_tracks_effective_changes(
        actions in prop::collection::vec(action_strategy(), 0..30)
    ) {
        let mut session = InventorySession::new(SessionConfig::empty()).unwrap();
        let mut expected: Vec<(AuditAction, String, i64)> = Vec::new();

        for action in &actions {
            let entries_before: Vec<ProductEntry> = session.current_entries();
            let held = |name: &str| {
                entries_before.iter().find(|e| e.name == name).map(|e| e.quantity)
            };
            let expected_before = expected.len();

            let recorded = match action {
                Action::Add(n, q) => {
                    expected.push((AuditAction::Added, NAMES[*n].to_string(), *q));
                    session.add_or_increment(NAMES[*n], *q).unwrap().into_iter().collect::<Vec<_>>()
                }
                Action::Remove(n) => {
                    if let Some(q) = held(NAMES[*n]) {
                        expected.push((AuditAction::Removed, NAMES[*n].to_string(), q));
                    }
                    session.remove(NAMES[*n]).unwrap().into_iter().collect()
                }
                Action::Purchase(n, q) => {
                    if held(NAMES[*n]).is_some() {
                        expected.push((AuditAction::Purchased, NAMES[*n].to_string(), *q));
                    }
                    session.purchase(NAMES[*n], *q).unwrap().into_iter().collect()
                }
                Action::Batch(items) => {
                    for (n, q) in items {
                        expected.push((AuditAction::BatchAdded, NAMES[*n].to_string(), *q));
                    }
                    session
                        .batch_add(items.iter().map(|(n, q)| (NAMES[*n], *q)))
                        .unwrap()
                }
            };

            prop_assert_eq!(recorded.len(), expected.len() - expected_before);
        }

        let actual: Vec<_> = session
            .history()
            .iter()
            .map(|e| (e.action(), e.product().to_string(), e.quantity()))
            .collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(session.current_entries().iter().all(|e| e.quantity >= 0));
    }
}
