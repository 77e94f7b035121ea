pub mod explore;
pub mod link;
