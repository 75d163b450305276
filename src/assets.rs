pub(crate) mod fetch;
pub(crate) mod shared;
