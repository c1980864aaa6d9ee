pub mod browser;
pub mod extractor;
pub mod http;
pub mod navigator;
pub mod traits;
pub mod types;

pub use browser::ChromeRenderer;
pub use extractor::Extractor;
pub use http::HttpRenderer;
pub use navigator::Navigator;
pub use traits::Renderer;
pub use types::{Selectors, SiteLayout};
