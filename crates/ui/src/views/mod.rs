mod card;
mod home;
mod state;

pub use card::{CardPage, CardScreen};
pub use home::HomeView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
pub(crate) mod test_harness;
#[cfg(test)]
mod view_smoke;
