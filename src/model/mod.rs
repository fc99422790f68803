//! Types that represent the core data model, such as `Record`, `Period` and `Ledger`.
mod amount;
mod ledger;
mod mapping;
mod period;
mod record;

pub use amount::{Amount, AmountError};
pub use ledger::Ledger;
pub use mapping::{Mapping, MappingError};
pub use period::Period;
pub use record::{Kind, Record, RecordColumn, Source};
