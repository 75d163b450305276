pub(crate) mod fonts;
pub(crate) mod resolve;
