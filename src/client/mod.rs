//! Panel client: the request gateway and the UI actions built on it.

pub mod actions;
pub mod console;
pub mod gateway;
pub mod page;

pub use actions::PanelActions;
pub use gateway::{HttpTransport, RequestGateway, Transport};
pub use page::{FormState, PanelPage};
