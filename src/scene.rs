pub(crate) mod binder;
pub(crate) mod graph;
pub(crate) mod view;
