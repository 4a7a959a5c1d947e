//! Ledger persistence - repository implementations and the artifact codec

mod codec;
mod in_memory;
mod json_file;

pub use codec::{decode_ledger, encode_ledger};
pub use in_memory::InMemoryLedgerRepository;
pub use json_file::JsonFileLedgerRepository;
