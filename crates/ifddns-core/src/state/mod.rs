// # Application State
//
// The single entity threaded through the polling loop. It is built once from
// configuration, passed by value into every step, and each step returns the
// derived state. Nothing is persisted: a restart begins with empty addresses
// and `update_required = true`.

pub mod app;
pub mod interface;

pub use app::AppState;
pub use interface::NetworkInterface;
