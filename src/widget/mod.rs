//! Widget system: the value capability trait and element state.

pub mod state;
pub mod traits;

pub use state::ElementState;
pub use traits::Widget;
