mod error;
mod traits;

pub mod memory;

pub use error::StoreError;
pub use memory::MemoryOptionStore;
pub use traits::OptionStore;
