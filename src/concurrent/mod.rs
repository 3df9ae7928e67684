pub mod manager;
pub mod signal;

pub use self::manager::{DataBlockManager, GenerationType};
pub use self::signal::{ConnectionId, DataChangedSignal};
