pub(crate) mod bag;
pub(crate) mod user;
