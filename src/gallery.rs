pub(crate) mod pager;
pub(crate) mod view;
