pub mod picture;

pub use picture::{MediaType, NormalizedFields, PictureRecord, RecordRejection, DATE_FORMAT};
