//! Building replacement requests and applying them through the edit service.

mod builder;
mod invoker;

pub use builder::EditSession;
pub use invoker::EditInvoker;
