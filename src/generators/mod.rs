pub mod capture;
pub mod page;
pub mod typst;

pub use capture::{flatten_on_white, RegionCapture, TypstCapture};
pub use page::{fit_to_page, PageWriter, Placement, TypstPageWriter};
pub use typst::{TypstCompiler, TypstFormat};
