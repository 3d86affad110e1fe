/// CSV export of store contents.
pub mod export;
