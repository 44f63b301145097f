pub mod active_month;
pub mod day_key;
pub mod error;
pub mod gateway;
pub mod holiday;
pub mod note_store;
pub mod persistence;
pub mod settings;
pub mod undo;

pub use day_key::DayKey;
pub use gateway::PersistenceGateway;
pub use holiday::{HolidayData, HolidayTable};
pub use persistence::Persistable;
pub use settings::{FontSpec, HexColor, Settings};
