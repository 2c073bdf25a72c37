mod home;
mod login;
mod state;
mod study;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use home::HomeView;
pub use login::LoginView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use study::StudyView;
