pub mod auth;
pub mod options;
pub mod platform;
pub mod records;
pub mod sanitize;
pub mod validate;
pub mod widget;

pub use platform::{Eula, PlatformRecord, PlatformRow, PlatformTable};
pub use records::RecordStore;
