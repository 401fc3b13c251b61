mod controller;
mod state;

pub use self::{controller::*, state::*};
