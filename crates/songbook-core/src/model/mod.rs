pub mod filter;
pub mod page;
pub mod song;

pub use filter::SongFilter;
pub use page::{PageRequest, Pagination, SongPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use song::{NewSong, Song, SongDetail, SongId};
