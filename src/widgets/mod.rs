//! Built-in leaf widgets.

pub mod checkbox;
pub mod choice;
pub mod display;
pub mod invisible;
pub mod slider;
pub mod submit;
pub mod text_field;

pub use checkbox::{Checkbox, CheckboxGroup};
pub use choice::{ChoiceEntry, Dropdown, RadioGroup};
pub use display::{ErrorElement, Heading, HtmlDisplay, Spacer};
pub use invisible::Invisible;
pub use slider::Slider;
pub use submit::Submit;
pub use text_field::{TextField, Textarea};
