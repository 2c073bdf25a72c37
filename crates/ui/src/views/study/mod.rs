mod components;
mod keys;
mod view;

pub use view::StudyView;
#[cfg(test)]
pub(crate) use view::StudyTestHandles;
