pub mod admin_panel;
pub mod kiosk_flow;
pub mod kiosk_session;
pub mod payment_gateway;

pub use admin_panel::*;
pub use kiosk_flow::*;
pub use kiosk_session::*;
pub use payment_gateway::*;
