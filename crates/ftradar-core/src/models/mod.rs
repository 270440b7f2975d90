mod item;
mod taxonomy;

pub use item::{
    ItemRecord, NewItem, RegulatoryItem, format_date, format_timestamp, join_tags, parse_date,
    parse_tags, parse_timestamp,
};
pub use taxonomy::{Category, ChangeType, Region};
