//! `SeaORM` entity definitions.

pub mod user_uploads;
