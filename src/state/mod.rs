//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `BookState`: the state of one catalog entry (pending, fetched, extracted, saved, recorded, failed)
//! - `BookProgress`: walks one book through the legal `BookState` transitions

mod book_state;

pub use book_state::{BookProgress, BookState};
