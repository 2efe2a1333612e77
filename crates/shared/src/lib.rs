pub mod calc;
pub mod error;
pub mod jump;
pub mod maps;
pub mod models;
#[cfg(feature = "uuid-support")]
pub mod plan;
pub mod scale;
pub mod session;

pub use error::GeoError;
