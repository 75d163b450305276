pub(crate) mod contain;
pub(crate) mod decode;
pub(crate) mod pixmap;
pub(crate) mod text;
