pub(crate) mod backend;
pub(crate) mod display;
pub(crate) mod flat;
pub(crate) mod thumbnail;
