pub mod overpass_collect;
pub mod response;

pub use overpass_collect::{CollectError, OverpassCollect};
pub use response::{Node, OverpassResponse, RawElements, Way};
