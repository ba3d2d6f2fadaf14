pub mod ledger;
pub mod memory;
pub mod pg;

pub use ledger::{LedgerStore, StoreError};
pub use memory::MemoryLedgerStore;
pub use pg::PgLedgerStore;
