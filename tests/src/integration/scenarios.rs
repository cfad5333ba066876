//! # Supply-Chain Scenarios
//!
//! End-to-end stories against the ledger engine:
//!
//! 1. **Happy path**: create → transfer via Transporter → dispense
//! 2. **Recall**: a recalled batch cannot move or be relocated
//! 3. **Rejections**: failed calls change nothing and emit nothing
//! 4. **Administration**: role removal, admin hand-over, forced metadata

#[cfg(test)]
mod tests {
    use crate::fixtures::{amoxicillin, empty_ledger, ledger_with_batch, staffed_ledger, Cast};
    use pc_custody::{CustodyApi, ErrorKind, NewBatch, PageRequest};
    use shared_bus::LedgerEvent;
    use shared_types::{ActorId, BatchStatus, Role};

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[test]
    fn test_scenario_create_transfer_dispense() {
        let (mut ledger, cast) = staffed_ledger();

        let id = ledger.create_batch(cast.manufacturer, amoxicillin()).unwrap();
        assert_eq!(id, 1);
        let batch = ledger.batch(id).unwrap();
        assert_eq!(batch.name, "Amoxicillin-500");
        assert_eq!(batch.batch_number, "B100");
        assert_eq!(batch.status, BatchStatus::Created);
        assert_eq!(batch.current_owner, cast.manufacturer);
        assert_eq!(ledger.owners_of(id).unwrap(), vec![cast.manufacturer]);

        // The Transporter moves a batch it does not hold.
        ledger
            .transfer_batch(cast.transporter, id, cast.pharmacy, BatchStatus::InTransit)
            .unwrap();
        assert_eq!(
            ledger.owners_of(id).unwrap(),
            vec![cast.manufacturer, cast.pharmacy]
        );
        assert_eq!(ledger.batch(id).unwrap().status, BatchStatus::InTransit);

        ledger.mark_dispensed(cast.pharmacy, id).unwrap();
        let batch = ledger.batch(id).unwrap();
        assert_eq!(batch.status, BatchStatus::Dispensed);
        assert_eq!(batch.current_owner, cast.pharmacy);
        // Dispensing is not a custody change.
        assert_eq!(ledger.owners_of(id).unwrap().len(), 2);
    }

    #[test]
    fn test_ids_increase_from_one() {
        let (mut ledger, cast) = staffed_ledger();
        let ids: Vec<u64> = (0..5)
            .map(|i| {
                ledger
                    .create_batch(
                        cast.manufacturer,
                        NewBatch::new(format!("Drug-{i}"), format!("L{i}"), ""),
                    )
                    .unwrap()
            })
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(ledger.batch_count(), 5);
    }

    #[test]
    fn test_owner_history_grows_by_one_per_transfer() {
        let (mut ledger, cast, id) = ledger_with_batch();
        let hops = [cast.distributor, cast.pharmacy, cast.distributor, cast.pharmacy];

        for (n, to) in hops.iter().enumerate() {
            ledger
                .transfer_batch(cast.transporter, id, *to, BatchStatus::InTransit)
                .unwrap();
            let owners = ledger.owners_of(id).unwrap();
            assert_eq!(owners.len(), n + 2);
            assert_eq!(owners[0], cast.manufacturer);
            assert_eq!(*owners.last().unwrap(), *to);
        }
    }

    #[test]
    fn test_location_trail_in_order_with_clock_time() {
        let (mut ledger, cast, id) = ledger_with_batch();
        let stops = ["Plant, Basel", "Hub, Frankfurt", "Pharmacy, Lyon"];

        for stop in stops {
            ledger.clock().advance_time(3_600);
            ledger
                .update_location(cast.transporter, id, stop.to_string(), None)
                .unwrap();
        }

        let trail = ledger.locations_of(id).unwrap();
        assert_eq!(trail.len(), 3);
        for (record, stop) in trail.iter().zip(stops) {
            assert_eq!(record.location, stop);
            assert_eq!(record.updater, cast.transporter);
        }
        assert!(trail.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_location_update_replaces_metadata_only_when_non_empty() {
        let (mut ledger, cast, id) = ledger_with_batch();

        ledger
            .update_location(cast.manufacturer, id, "Dock 4".into(), Some(String::new()))
            .unwrap();
        assert_eq!(ledger.batch(id).unwrap().metadata_uri, "ipfs://amoxicillin-b100");

        ledger
            .update_location(cast.regulator, id, "Inspection".into(), Some("ipfs://v2".into()))
            .unwrap();
        assert_eq!(ledger.batch(id).unwrap().metadata_uri, "ipfs://v2");
    }

    #[test]
    fn test_pages_concatenate_to_full_history() {
        let (mut ledger, cast, id) = ledger_with_batch();
        for n in 0..11 {
            let to = if n % 2 == 0 { cast.distributor } else { cast.pharmacy };
            ledger
                .transfer_batch(cast.transporter, id, to, BatchStatus::InTransit)
                .unwrap();
        }
        let full = ledger.owners_of(id).unwrap();
        assert_eq!(full.len(), 12);

        let mut collected = Vec::new();
        let mut offset = 0;
        loop {
            let page = ledger.owners_page(id, PageRequest::new(offset, 5)).unwrap();
            assert_eq!(page.total, 12);
            offset += page.items.len();
            collected.extend(page.items.iter().copied());
            if !page.has_more() {
                break;
            }
        }
        assert_eq!(collected, full);
    }

    // =========================================================================
    // RECALL
    // =========================================================================

    #[test]
    fn test_scenario_recall_blocks_movement() {
        let (mut ledger, cast, id) = ledger_with_batch();
        ledger.recall_batch(cast.regulator, id).unwrap();
        assert_eq!(ledger.batch(id).unwrap().status, BatchStatus::Recalled);

        let err = ledger
            .transfer_batch(cast.manufacturer, id, cast.pharmacy, BatchStatus::InTransit)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let err = ledger
            .update_location(cast.regulator, id, "Quarantine".into(), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        assert_eq!(ledger.owners_of(id).unwrap(), vec![cast.manufacturer]);
        assert!(ledger.locations_of(id).unwrap().is_empty());
    }

    #[test]
    fn test_repeat_recall_re_emits() {
        let (mut ledger, cast, id) = ledger_with_batch();
        let before = ledger.last_sequence();

        ledger.recall_batch(cast.regulator, id).unwrap();
        ledger.recall_batch(cast.regulator, id).unwrap();

        let events = ledger.events_since(before);
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|r| matches!(r.event, LedgerEvent::BatchRecalled { batch_id: 1, .. })));
    }

    #[test]
    fn test_only_regulator_recalls() {
        let (mut ledger, cast, id) = ledger_with_batch();
        for caller in [cast.manufacturer, cast.pharmacy, cast.outsider] {
            let err = ledger.recall_batch(caller, id).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
        }
        assert_eq!(ledger.batch(id).unwrap().status, BatchStatus::Created);
    }

    #[test]
    fn test_recalled_batch_still_dispensable_by_holding_pharmacy() {
        let (mut ledger, cast, id) = ledger_with_batch();
        ledger
            .transfer_batch(cast.manufacturer, id, cast.pharmacy, BatchStatus::Received)
            .unwrap();
        ledger.recall_batch(cast.regulator, id).unwrap();

        ledger.mark_dispensed(cast.pharmacy, id).unwrap();
        assert_eq!(ledger.batch(id).unwrap().status, BatchStatus::Dispensed);
    }

    // =========================================================================
    // REJECTIONS
    // =========================================================================

    #[test]
    fn test_transfer_to_unregistered_changes_nothing() {
        let (mut ledger, cast, id) = ledger_with_batch();
        let journal = ledger.last_sequence();
        let snapshot = ledger.batch(id).unwrap();

        let err = ledger
            .transfer_batch(cast.manufacturer, id, cast.outsider, BatchStatus::InTransit)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        assert_eq!(ledger.batch(id).unwrap(), snapshot);
        assert_eq!(ledger.owners_of(id).unwrap(), vec![cast.manufacturer]);
        assert_eq!(ledger.last_sequence(), journal);
    }

    #[test]
    fn test_transfer_back_to_created_rejected() {
        let (mut ledger, cast, id) = ledger_with_batch();
        let err = ledger
            .transfer_batch(cast.manufacturer, id, cast.pharmacy, BatchStatus::Created)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_non_admin_set_role_rejected() {
        let (mut ledger, cast) = staffed_ledger();
        let participants = ledger.participants();

        let err = ledger
            .set_role(cast.manufacturer, cast.outsider, Role::Regulator)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(ledger.role_of(&cast.outsider), Role::None);
        assert_eq!(ledger.participants(), participants);
    }

    #[test]
    fn test_non_admin_remove_role_rejected() {
        let (mut ledger, cast) = staffed_ledger();
        let participants = ledger.participants();
        let before = ledger.last_sequence();

        let err = ledger
            .remove_role(cast.regulator, cast.pharmacy)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(ledger.role_of(&cast.pharmacy), Role::Pharmacy);
        assert_eq!(ledger.participants(), participants);
        assert_eq!(ledger.last_sequence(), before);
    }

    #[test]
    fn test_unknown_batch_not_found() {
        let (mut ledger, cast) = staffed_ledger();
        assert_eq!(ledger.batch(42).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(ledger.owners_of(42).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(ledger.locations_of(42).unwrap_err().kind(), ErrorKind::NotFound);

        let err = ledger
            .update_location(cast.transporter, 42, "Dock 1".into(), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = ledger.mark_dispensed(cast.pharmacy, 42).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_rejections_leave_journal_untouched() {
        let (mut ledger, cast, id) = ledger_with_batch();
        let before = ledger.last_sequence();

        let _ = ledger.create_batch(cast.pharmacy, amoxicillin());
        let _ = ledger.mark_dispensed(cast.pharmacy, id);
        let _ = ledger.update_location(cast.outsider, id, "Nowhere".into(), None);
        let _ = ledger.set_role(cast.admin, ActorId::ZERO, Role::Pharmacy);
        let _ = ledger.set_role(cast.admin, cast.outsider, Role::None);
        let _ = ledger.force_set_metadata_uri(cast.regulator, id, "x".into());

        assert_eq!(ledger.last_sequence(), before);
        assert!(ledger.events_since(before).is_empty());
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    #[test]
    fn test_removed_role_keeps_history() {
        let (mut ledger, cast, id) = ledger_with_batch();
        ledger.remove_role(cast.admin, cast.manufacturer).unwrap();

        assert_eq!(ledger.role_of(&cast.manufacturer), Role::None);
        assert_eq!(ledger.owners_of(id).unwrap(), vec![cast.manufacturer]);
        let err = ledger
            .create_batch(cast.manufacturer, amoxicillin())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_admin_hand_over() {
        let cast = Cast::default();
        let mut ledger = empty_ledger(&cast);
        let successor = cast.regulator;

        ledger.change_admin(cast.admin, successor).unwrap();
        assert_eq!(ledger.admin(), successor);
        assert_eq!(ledger.role_of(&successor), Role::Regulator);
        // The previous admin keeps the role it was granted.
        assert_eq!(ledger.role_of(&cast.admin), Role::Regulator);

        let err = ledger
            .set_role(cast.admin, cast.pharmacy, Role::Pharmacy)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        ledger
            .set_role(successor, cast.pharmacy, Role::Pharmacy)
            .unwrap();
    }

    #[test]
    fn test_forced_metadata() {
        let (mut ledger, cast, id) = ledger_with_batch();
        ledger
            .force_set_metadata_uri(cast.admin, id, "ipfs://corrected".into())
            .unwrap();
        assert_eq!(ledger.batch(id).unwrap().metadata_uri, "ipfs://corrected");

        let last = ledger.events_since(ledger.last_sequence() - 1);
        assert_eq!(
            last[0].event,
            LedgerEvent::MetadataForced {
                batch_id: id,
                uri: "ipfs://corrected".into()
            }
        );

        let err = ledger
            .force_set_metadata_uri(cast.admin, 99, "x".into())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
