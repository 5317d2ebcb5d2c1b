pub mod policy;
pub mod record;

pub use policy::{BareSecondaryPolicy, SecondaryNaming};
pub use record::RepositoryRecord;
