//! # Integration Test Flows
//!
//! The custody service, the shared bus and the node pipeline working
//! together:
//!
//! 1. **Service → Bus**: committed commands reach topic and batch subscribers
//! 2. **Dispatcher**: error kinds and envelope checks survive the wire format
//! 3. **Node**: newline-delimited requests in, one response per line out

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use crate::fixtures::{staffed_service, Cast};
    use node_runtime::NodeRuntime;
    use pc_custody::{
        ErrorKind, LedgerCommand, LedgerConfig, LedgerQuery, LedgerReply, LedgerRequest,
        LedgerResponse, ManualClock, PageRequest,
    };
    use shared_bus::{EventFilter, EventTopic, LedgerEvent};
    use shared_types::{ActorId, AuthenticatedRequest, BatchStatus, Role};

    fn request(actor: ActorId, payload: impl Into<LedgerRequest>) -> AuthenticatedRequest<LedgerRequest> {
        AuthenticatedRequest::new(actor, payload.into())
    }

    fn create(name: &str) -> LedgerCommand {
        LedgerCommand::CreateBatch {
            name: name.into(),
            batch_number: "B100".into(),
            metadata_uri: String::new(),
        }
    }

    // =========================================================================
    // SERVICE → BUS
    // =========================================================================

    #[tokio::test]
    async fn test_location_subscriber_sees_only_location_events() {
        let (service, bus, cast) = staffed_service();
        let mut locations = bus.subscribe(EventFilter::topics(vec![EventTopic::Location]));

        service.handle(request(cast.manufacturer, create("Paracetamol"))).await;
        let resp = service
            .handle(request(
                cast.transporter,
                LedgerCommand::UpdateLocation {
                    batch_id: 1,
                    location: "Warehouse 9".into(),
                    metadata_uri: None,
                },
            ))
            .await;
        assert!(resp.is_ok());

        let record = timeout(Duration::from_millis(100), locations.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        match record.event {
            LedgerEvent::LocationUpdated {
                batch_id,
                location,
                updater,
                ..
            } => {
                assert_eq!(batch_id, 1);
                assert_eq!(location, "Warehouse 9");
                assert_eq!(updater, cast.transporter);
            }
            other => panic!("Expected LocationUpdated event, got {:?}", other),
        }
        assert!(locations.try_recv().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_batch_filter_isolates_batches() {
        let (service, bus, cast) = staffed_service();
        let mut second = bus.subscribe(EventFilter::for_batches(vec![2]));

        service.handle(request(cast.manufacturer, create("First"))).await;
        service.handle(request(cast.manufacturer, create("Second"))).await;
        service
            .handle(request(cast.regulator, LedgerCommand::RecallBatch { batch_id: 1 }))
            .await;

        let record = timeout(Duration::from_millis(100), second.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        assert_eq!(record.event.batch_id(), Some(2));
        assert!(second.try_recv().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bus_replays_nothing_the_journal_lacks() {
        let (service, bus, cast) = staffed_service();
        let mut all = bus.subscribe(EventFilter::all());

        service.handle(request(cast.manufacturer, create("Insulin"))).await;
        service
            .handle(request(cast.outsider, LedgerCommand::RecallBatch { batch_id: 1 }))
            .await;
        service
            .handle(request(
                cast.manufacturer,
                LedgerCommand::TransferBatch {
                    batch_id: 1,
                    to: cast.distributor,
                    status: BatchStatus::InTransit,
                },
            ))
            .await;

        let journal = service
            .handle(request(cast.outsider, LedgerQuery::EventsSince { after: 5 }))
            .await;
        let Some(LedgerReply::Events(journal)) = journal.reply().cloned() else {
            panic!("expected events reply");
        };

        let mut published = Vec::new();
        while let Some(record) = all.try_recv().unwrap() {
            published.push(record);
        }
        assert_eq!(published, journal);
        assert_eq!(published.len(), 2);
    }

    // =========================================================================
    // DISPATCHER
    // =========================================================================

    #[tokio::test]
    async fn test_error_kinds_through_service() {
        let (service, _bus, cast) = staffed_service();

        let unauthorized = service
            .handle(request(
                cast.pharmacy,
                LedgerCommand::SetRole {
                    target: cast.outsider,
                    role: Role::Manufacturer,
                },
            ))
            .await;
        assert_eq!(unauthorized.error_kind(), Some(ErrorKind::Unauthorized));

        let not_found = service
            .handle(request(cast.pharmacy, LedgerQuery::GetBatch { batch_id: 7 }))
            .await;
        assert_eq!(not_found.error_kind(), Some(ErrorKind::NotFound));

        let invalid = service
            .handle(request(
                cast.admin,
                LedgerCommand::ChangeAdmin {
                    new_admin: ActorId::ZERO,
                },
            ))
            .await;
        assert_eq!(invalid.error_kind(), Some(ErrorKind::InvalidArgument));
    }

    #[tokio::test]
    async fn test_page_query_through_service() {
        let (service, _bus, cast) = staffed_service();
        service.handle(request(cast.manufacturer, create("Vaccine"))).await;
        for to in [cast.distributor, cast.pharmacy, cast.distributor] {
            service
                .handle(request(
                    cast.transporter,
                    LedgerCommand::TransferBatch {
                        batch_id: 1,
                        to,
                        status: BatchStatus::InTransit,
                    },
                ))
                .await;
        }

        let resp = service
            .handle(request(
                cast.outsider,
                LedgerQuery::GetOwnersPage {
                    batch_id: 1,
                    page: PageRequest::new(1, 2),
                },
            ))
            .await;
        let Some(LedgerReply::OwnersPage(page)) = resp.reply() else {
            panic!("expected owners page, got {:?}", resp);
        };
        assert_eq!(page.items, vec![cast.distributor, cast.pharmacy]);
        assert_eq!(page.offset, 1);
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_wrong_envelope_version_never_reaches_ledger() {
        let (service, bus, cast) = staffed_service();
        let mut all = bus.subscribe(EventFilter::all());

        let mut envelope = request(cast.manufacturer, create("Ghost"));
        envelope.version = 2;
        let resp = service.handle(envelope).await;

        assert_eq!(resp.error_kind(), Some(ErrorKind::InvalidArgument));
        assert!(all.try_recv().unwrap().is_none());
        assert_eq!(service.read(|l| l.batch_count()).await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_creators_get_distinct_ids() {
        let (service, _bus, cast) = staffed_service();

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = Arc::clone(&service);
            let maker = cast.manufacturer;
            handles.push(tokio::spawn(async move {
                service.handle(request(maker, create(&format!("Lot-{i}")))).await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            match handle.await.unwrap().reply() {
                Some(LedgerReply::BatchId(id)) => ids.push(*id),
                other => panic!("expected batch id, got {:?}", other),
            }
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<u64>>());
    }

    // =========================================================================
    // NODE PIPELINE
    // =========================================================================

    #[tokio::test]
    async fn test_node_round_trips_wire_format() {
        let cast = Cast::default();
        let config = LedgerConfig::default().with_admin(cast.admin);
        let node = NodeRuntime::new(&config, ManualClock::default()).unwrap();

        let lines: Vec<String> = [
            request(
                cast.admin,
                LedgerCommand::SetRole {
                    target: cast.manufacturer,
                    role: Role::Manufacturer,
                },
            ),
            request(cast.manufacturer, create("Amoxicillin-500")),
            request(cast.outsider, LedgerQuery::GetOwnersHistory { batch_id: 1 }),
        ]
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect();

        let mut output = Vec::new();
        node.run(lines.join("\n").as_bytes(), &mut output).await.unwrap();

        let responses: Vec<LedgerResponse> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(
            responses[2].reply(),
            Some(&LedgerReply::Owners(vec![cast.manufacturer]))
        );
    }
}
