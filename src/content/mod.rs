pub mod http;
pub mod layout;
pub mod source;
pub mod types;

pub use http::{HttpContentSource, build_http_client};
pub use layout::ContentLayout;
pub use source::{ContentFetcher, FetchError, ResourceProbe};
pub use types::{DayKind, DayRecord, Entry, Media, SabbathQuestion, UiStrings};
