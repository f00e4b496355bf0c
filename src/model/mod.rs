pub mod amount;
pub mod chain;
pub mod tx;

pub use amount::{Amount, TokenHandle};
pub use chain::Chain;
pub use tx::{CalldataBlob, TransactionBatch, TransactionStep, TxHash};
