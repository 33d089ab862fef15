pub mod format;
pub mod ids;

pub use format::{days_since, format_currency, format_date, format_phone};
pub use ids::{generate_id, IdPrefix};
