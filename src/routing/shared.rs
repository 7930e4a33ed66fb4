//! Atomically replaceable routing table.
//!
//! Readers take a snapshot with [`SharedTable::load`] and keep using it for
//! the rest of a request; a rebuilt table installed with
//! [`SharedTable::replace`] is seen by the next `load`.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::routing::router::RoutingTable;

#[derive(Debug)]
pub struct SharedTable {
    current: ArcSwap<RoutingTable>,
}

impl SharedTable {
    pub fn new(table: RoutingTable) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
        }
    }

    /// Current table, lock-free.
    pub fn load(&self) -> Arc<RoutingTable> {
        self.current.load_full()
    }

    /// Install `table`, returning the one it replaces.
    pub fn replace(&self, table: RoutingTable) -> Arc<RoutingTable> {
        let routes = table.len();
        let previous = self.current.swap(Arc::new(table));
        info!(routes, previous_routes = previous.len(), "Routing table replaced");
        previous
    }
}
