pub mod layout;
mod pdf;

pub use layout::{Glyph, PageBox, render_page};
pub use pdf::{ExtractedPages, extract_pages, extract_pages_from_mem};
