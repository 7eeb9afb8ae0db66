//! Model-based property test for the connection registry: after an arbitrary
//! interleaving of register and unregister operations, the registry holds
//! exactly the registered-but-not-yet-unregistered connections.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;
use tokio::sync::mpsc;
use uuid::Uuid;

use note_relay::adapters::websocket::{ConnectionHandle, ConnectionId, ConnectionRegistry};
use note_relay::domain::UserId;

/// One step against a pool of connection slots. `Unregister` on a slot that
/// was never registered (or was already removed) exercises the no-op path.
#[derive(Debug, Clone)]
enum Op {
    Register { slot: usize, principal: usize },
    Unregister { slot: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..16usize, 0..4usize).prop_map(|(slot, principal)| Op::Register { slot, principal }),
        (0..16usize).prop_map(|slot| Op::Unregister { slot }),
    ]
}

proptest! {
    #[test]
    fn registry_matches_model_after_any_interleaving(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        rt.block_on(async move {
            let registry = Arc::new(ConnectionRegistry::new());
            let principals: Vec<UserId> =
                (0..4).map(|_| UserId::from_uuid(Uuid::new_v4())).collect();

            // Model state: slot -> (connection id, principal index).
            let mut model: HashMap<usize, (ConnectionId, usize)> = HashMap::new();
            // Receivers are kept alive so channel closure never interferes.
            let mut receivers = Vec::new();

            for op in ops {
                match op {
                    Op::Register { slot, principal } => {
                        let (tx, rx) = mpsc::channel(1);
                        receivers.push(rx);
                        let id = ConnectionId::new();
                        registry
                            .register(ConnectionHandle {
                                id,
                                principal: principals[principal],
                                sender: tx,
                            })
                            .await;
                        // Re-registering a slot models a replaced connection;
                        // the old entry must be removed explicitly, as its
                        // handler would on disconnect.
                        if let Some((old_id, _)) = model.insert(slot, (id, principal)) {
                            registry.unregister(&old_id).await;
                        }
                    }
                    Op::Unregister { slot } => {
                        match model.remove(&slot) {
                            Some((id, _)) => registry.unregister(&id).await,
                            // Unregistering something absent must be a no-op.
                            None => registry.unregister(&ConnectionId::new()).await,
                        }
                    }
                }
            }

            // At quiescence the registry holds exactly the model's survivors.
            prop_assert_eq!(registry.total_connections().await, model.len());
            for (idx, principal) in principals.iter().enumerate() {
                let expected = model.values().filter(|(_, p)| *p == idx).count();
                prop_assert_eq!(registry.connection_count(principal).await, expected);

                let connections = registry.connections_for(principal).await;
                prop_assert_eq!(connections.len(), expected);
                for handle in connections {
                    prop_assert!(model
                        .values()
                        .any(|(id, p)| *id == handle.id && *p == idx));
                }
            }
            Ok(())
        })?;
    }
}
